//! 8-bit RGBA color.
//!
//! Colors are plain named-field structs; [`Color::as_array`] and indexing
//! provide the flat channel view where code wants to loop over channels.

use std::ops::Index;

/// A color with four 8-bit channels, laid out `r, g, b, a` in memory.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// All channels zero. This is what the color buffer is cleared to.
    pub const CLEAR: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    pub const fn as_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    /// Channel-wise linear blend, `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let a = self.as_array();
        let b = other.as_array();
        let mix = |i: usize| {
            let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(0), mix(1), mix(2), mix(3))
    }
}

impl Index<usize> for Color {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        match index {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            3 => &self.a,
            _ => panic!("Color channel out of range: {index}"),
        }
    }
}

/// Reinterprets a slice of colors as packed `RGBA` bytes.
pub fn as_bytes(colors: &[Color]) -> &[u8] {
    // SAFETY: Color is repr(C) with four u8 fields, so it has size 4,
    // alignment 1 and no padding.
    unsafe { std::slice::from_raw_parts(colors.as_ptr() as *const u8, colors.len() * 4) }
}
