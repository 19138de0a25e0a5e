//! 2D textures and sampling.
//!
//! A [`Texture`] owns raw 8-bit texels with 3 (RGB) or 4 (RGBA) channels and
//! samples them under a [`WrapMode`] and a [`SampleMode`].
//!
//! # Coordinate Convention
//! - Integer texel `(0, 0)` is the first texel of the first row (top-left).
//! - Normalized `(u, v)` spans `[0, 1]` across the whole texture; texel
//!   centers sit at half-integers, so `t = (u * width, v * height) - 0.5`.

use std::path::Path;

use image::DynamicImage;
use log::{info, warn};

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::math::Vec2;

/// How out-of-range texel indices are mapped back into the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WrapMode {
    /// Indices wrap around (tiling).
    #[default]
    Repeat,
    /// Indices saturate to the border texel.
    Clamp,
}

/// How normalized coordinates are reconstructed from texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SampleMode {
    /// The texel whose center is closest.
    #[default]
    Nearest,
    /// Weighted blend of the four surrounding texels.
    Bilinear,
}

/// A 2D texel grid with wrap and sample policies.
#[derive(Clone, Debug)]
pub struct Texture {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    wrap: WrapMode,
    sample: SampleMode,
}

impl Texture {
    /// Wraps raw texel bytes.
    ///
    /// Fails with [`RenderError::UnsupportedChannelCount`] unless `channels`
    /// is 3 or 4, with [`RenderError::EmptyTexture`] if either dimension is
    /// zero, and with [`RenderError::TextureSizeMismatch`] if `data` does not
    /// hold exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(RenderError::UnsupportedChannelCount(channels));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTexture { width, height });
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(RenderError::TextureSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            channels,
            wrap: WrapMode::default(),
            sample: SampleMode::default(),
        })
    }

    /// Load a texture from an image file (PNG, JPG, etc.)
    ///
    /// Returns `None` when the file is missing or cannot be decoded; the
    /// caller decides whether an absent texture matters. Images without
    /// alpha keep 3 channels, everything else is converted to RGBA.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        let img = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                warn!("Could not load texture {}: {err}", path.display());
                return None;
            }
        };

        let (width, height) = (img.width(), img.height());
        let (channels, data) = match img {
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
            other => (3, other.to_rgb8().into_raw()),
        };

        match Self::new(width, height, channels, data) {
            Ok(texture) => {
                info!(
                    "Loaded texture {} ({width}x{height}, {channels} channels)",
                    path.display()
                );
                Some(texture)
            }
            Err(err) => {
                warn!("Rejected texture {}: {err}", path.display());
                None
            }
        }
    }

    pub fn with_wrap_mode(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_sample_mode(mut self, sample: SampleMode) -> Self {
        self.sample = sample;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn sample_mode(&self) -> SampleMode {
        self.sample
    }

    /// Fetch the texel at integer coordinates, applying the wrap mode.
    ///
    /// 3-channel textures return opaque colors (alpha 255).
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> Color {
        let x = self.wrap_index(x, self.width);
        let y = self.wrap_index(y, self.height);

        let channels = self.channels as usize;
        let i = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[i..i + channels];
        match *px {
            [r, g, b] => Color::rgb(r, g, b),
            [r, g, b, a] => Color::new(r, g, b, a),
            // `new` only admits 3 or 4 channels.
            _ => unreachable!("texture with {channels} channels"),
        }
    }

    /// Map an index on an axis of `size` texels into `0..size`.
    #[inline]
    fn wrap_index(&self, i: i64, size: u32) -> i64 {
        let size = i64::from(size);
        match self.wrap {
            WrapMode::Repeat => i.rem_euclid(size),
            WrapMode::Clamp => i.clamp(0, size - 1),
        }
    }

    /// Sample the texture at normalized coordinates.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> Color {
        let tx = uv.u() * self.width as f32 - 0.5;
        let ty = uv.v() * self.height as f32 - 0.5;

        match self.sample {
            SampleMode::Nearest => self.texel(tx.round() as i64, ty.round() as i64),
            SampleMode::Bilinear => {
                let (fx, fy) = (tx.floor(), ty.floor());
                // Casts saturate on huge or infinite coordinates.
                let (x, y) = (fx as i64, fy as i64);
                let (x1, y1) = (x.saturating_add(1), y.saturating_add(1));
                let (s, t) = (tx - fx, ty - fy);

                let top = self.texel(x, y).lerp(self.texel(x1, y), s);
                let bottom = self.texel(x, y1).lerp(self.texel(x1, y1), s);
                top.lerp(bottom, t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 RGB texture where texel (x, y) has red = 10 * x + 100 * y.
    fn gradient(wrap: WrapMode, sample: SampleMode) -> Texture {
        let mut data = Vec::new();
        for y in 0..2u8 {
            for x in 0..4u8 {
                data.extend_from_slice(&[10 * x + 100 * y, x, y]);
            }
        }
        Texture::new(4, 2, 3, data)
            .unwrap()
            .with_wrap_mode(wrap)
            .with_sample_mode(sample)
    }

    #[test]
    fn rejects_unsupported_channel_counts() {
        let err = Texture::new(1, 1, 2, vec![0, 0]).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedChannelCount(2)));
    }

    #[test]
    fn rejects_mismatched_data_length() {
        let err = Texture::new(2, 2, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::TextureSizeMismatch {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn rejects_empty_texture() {
        let err = Texture::new(0, 4, 3, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::EmptyTexture {
                width: 0,
                height: 4
            }
        ));
        assert_eq!(err.to_string(), "texture has zero size (0x4)");
    }

    #[test]
    fn rgb_texels_are_opaque_and_rgba_keeps_alpha() {
        let rgb = gradient(WrapMode::Repeat, SampleMode::Nearest);
        assert_eq!(rgb.texel(1, 1), Color::rgb(110, 1, 1));

        let rgba = Texture::new(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(rgba.texel(0, 0), Color::new(1, 2, 3, 4));
    }

    #[test]
    fn repeat_wraps_indices() {
        let tex = gradient(WrapMode::Repeat, SampleMode::Nearest);
        assert_eq!(tex.texel(4, 0), tex.texel(0, 0));
        assert_eq!(tex.texel(-1, 0), tex.texel(3, 0));
        assert_eq!(tex.texel(1, -1), tex.texel(1, 1));
    }

    #[test]
    fn clamp_saturates_indices() {
        let tex = gradient(WrapMode::Clamp, SampleMode::Nearest);
        assert_eq!(tex.texel(4, 0), tex.texel(3, 0));
        assert_eq!(tex.texel(-5, 7), tex.texel(0, 1));
    }

    #[test]
    fn nearest_picks_texel_under_coordinate() {
        let tex = gradient(WrapMode::Clamp, SampleMode::Nearest);
        // Center of texel (2, 1).
        assert_eq!(tex.sample(Vec2::new(2.5 / 4.0, 1.5 / 2.0)), tex.texel(2, 1));
    }

    #[test]
    fn bilinear_matches_nearest_on_texel_centers() {
        let nearest = gradient(WrapMode::Repeat, SampleMode::Nearest);
        let bilinear = gradient(WrapMode::Repeat, SampleMode::Bilinear);
        for (x, y) in [(0, 0), (1, 0), (3, 1), (2, 1)] {
            let uv = Vec2::new((x as f32 + 0.5) / 4.0, (y as f32 + 0.5) / 2.0);
            assert_eq!(bilinear.sample(uv), nearest.sample(uv));
        }
    }

    #[test]
    fn bilinear_blends_between_neighbors() {
        let tex = gradient(WrapMode::Clamp, SampleMode::Bilinear);
        // Halfway between texel (1, 0) and (2, 0): red 10 -> 20.
        let c = tex.sample(Vec2::new(2.0 / 4.0, 0.5 / 2.0));
        assert_eq!(c.r, 15);
        // Halfway between rows 0 and 1 at texel column 0: red 0 -> 100.
        let c = tex.sample(Vec2::new(0.5 / 4.0, 1.0 / 2.0));
        assert_eq!(c.r, 50);
    }

    #[test]
    fn far_coordinates_sample_without_overflow() {
        for wrap in [WrapMode::Repeat, WrapMode::Clamp] {
            for sample in [SampleMode::Nearest, SampleMode::Bilinear] {
                let tex = gradient(wrap, sample);
                for uv in [
                    Vec2::new(1.0e10, 1.0e10),
                    Vec2::new(-1.0e10, -1.0e10),
                    Vec2::new(f32::MAX, f32::MIN),
                    Vec2::new(f32::INFINITY, f32::NEG_INFINITY),
                ] {
                    tex.sample(uv);
                }
            }
        }

        // Clamped far corners settle on the border texels.
        let tex = gradient(WrapMode::Clamp, SampleMode::Bilinear);
        assert_eq!(tex.sample(Vec2::new(1.0e10, 1.0e10)), tex.texel(3, 1));
        assert_eq!(tex.sample(Vec2::new(-1.0e10, -1.0e10)), tex.texel(0, 0));
    }

    #[test]
    fn bilinear_repeat_blends_across_the_seam() {
        let tex = gradient(WrapMode::Repeat, SampleMode::Bilinear);
        // Halfway between texel (3, 0) and its wrapped neighbor (0, 0).
        let c = tex.sample(Vec2::new(4.0 / 4.0, 0.5 / 2.0));
        assert_eq!(c.r, 15);
    }

    #[test]
    fn missing_file_is_absent_not_fatal() {
        assert!(Texture::from_file("does/not/exist.png").is_none());
    }
}
