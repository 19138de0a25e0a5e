//! Frame buffer storage for 2D pixel access.
//!
//! [`Buffer`] is a dense row-major grid addressed by `(x, y)`. [`FrameBuffer`]
//! pairs a depth grid with a color grid of the same size; both are allocated
//! once and reset in place every frame.
//!
//! # Depth Buffer
//!
//! The depth buffer stores NDC z (after the perspective divide) for each
//! pixel. Smaller values are closer to the camera, so the buffer is cleared
//! to `+infinity`.

use std::ops::{Index, IndexMut};

use crate::color::{self, Color};

/// A dense `width x height` grid of cells.
///
/// Cell access does not bounds-check `x` against the width: the rasterizer
/// clamps its coverage box to the viewport before touching any cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy> Buffer<T> {
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            cells: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.cells[x + y * self.width]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        debug_assert!(x < self.width && y < self.height);
        &mut self.cells[x + y * self.width]
    }

    /// Resets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }
}

impl<T: Copy> Index<(usize, usize)> for Buffer<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        self.at(x, y)
    }
}

impl<T: Copy> IndexMut<(usize, usize)> for Buffer<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        self.at_mut(x, y)
    }
}

/// Depth and color targets for one viewport.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub depth: Buffer<f32>,
    pub color: Buffer<Color>,
}

impl FrameBuffer {
    /// Depth value of a pixel nothing has been drawn to.
    pub const CLEAR_DEPTH: f32 = f32::INFINITY;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: Buffer::new(width, height, Self::CLEAR_DEPTH),
            color: Buffer::new(width, height, Color::CLEAR),
        }
    }

    pub fn width(&self) -> usize {
        self.color.width()
    }

    pub fn height(&self) -> usize {
        self.color.height()
    }

    /// Resets depth to `+infinity` and color to zero.
    pub fn clear(&mut self) {
        self.depth.fill(Self::CLEAR_DEPTH);
        self.color.fill(Color::CLEAR);
    }

    /// The color buffer as packed RGBA bytes, 4 per pixel.
    pub fn color_bytes(&self) -> &[u8] {
        color::as_bytes(self.color.as_slice())
    }

    /// Renders the depth buffer as grayscale into `out`.
    ///
    /// Each covered pixel shows `1 / depth` clamped to `[0, 1]`; pixels still
    /// at the clear depth are black.
    pub fn visualize_depth(&self, out: &mut Buffer<Color>) {
        debug_assert_eq!(out.as_slice().len(), self.depth.as_slice().len());
        for (dst, &z) in out.as_mut_slice().iter_mut().zip(self.depth.as_slice()) {
            *dst = if z.is_finite() {
                let level = (1.0 / z).clamp(0.0, 1.0);
                Color::gray((level * 255.0).round() as u8)
            } else {
                Color::BLACK
            };
        }
    }
}
