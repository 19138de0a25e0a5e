//! Edge function-based triangle rasterization.
//!
//! This module implements Pineda's edge function algorithm with fixed-point
//! sub-pixel precision and incremental evaluation, the scheme GPUs use.
//!
//! # Algorithm Overview
//!
//! 1. Snap the screen-space vertices to a fixed-point grid of
//!    `precision` sub-pixel steps per pixel
//! 2. Compute the bounding box and clamp it to the viewport
//! 3. Evaluate the three edge functions once at the first pixel center,
//!    then step them by constant per-column / per-row deltas
//! 4. A pixel is covered when all three (biased) edge values are positive
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! Screen space has y pointing down. A triangle whose vertices run
//! clockwise on screen has positive signed area, and its interior is where
//! all three edge functions are positive. Counter-clockwise (back-facing)
//! and zero-area triangles are skipped.
//!
//! # Fill Rule
//!
//! Pixel centers lying exactly on an edge belong to the triangle only if
//! the edge is a *top* edge (horizontal, running right) or a *left* edge
//! (running up). Adding one fixed-point unit to those edges' values turns
//! `E >= 0` into `E > 0` for them alone, so two triangles sharing an edge
//! never both draw, and never both skip, a pixel on it.
//!
//! # Barycentric Coordinates
//!
//! The edge values sum to the signed area, so
//!
//! ```text
//! lambda_i = E_i(P) / area
//! ```
//!
//! where E_i is the edge opposite vertex i. Depth is interpolated with these
//! screen-linear weights. Attributes are interpolated with the
//! perspective-correct weights `lambda_i * (1/w_i)`, renormalized.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Fabian Giesen, "Triangle rasterization in practice" (2013)

use log::trace;

use super::shader::{Shader, Varying};
use crate::math::Vec3;
use crate::render::framebuffer::FrameBuffer;

/// Default number of sub-pixel steps per pixel.
pub const SUBPIXEL_PRECISION: i64 = 16;

/// Largest fixed-point coordinate magnitude accepted. Edge products of
/// coordinates below this bound stay far inside `i64`.
const GUARD_BAND: i64 = 1 << 28;

/// A vertex position snapped to the fixed-point grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FixedPoint {
    x: i64,
    y: i64,
}

impl FixedPoint {
    fn snap(v: &Varying, precision: f32) -> Option<Self> {
        let x = (v.position.x * precision).round();
        let y = (v.position.y * precision).round();
        let limit = GUARD_BAND as f32;
        if !(x.abs() < limit && y.abs() < limit) {
            // Also rejects NaN.
            return None;
        }
        Some(Self {
            x: x as i64,
            y: y as i64,
        })
    }
}

/// Computes the edge function value for point P relative to edge (A -> B).
#[inline]
fn edge(a: FixedPoint, b: FixedPoint, p: FixedPoint) -> i64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top edges run right along a row, left edges run up.
#[inline]
fn is_top_left(a: FixedPoint, b: FixedPoint) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dy < 0 || (dy == 0 && dx > 0)
}

/// Converts screen-linear weights into perspective-correct ones.
///
/// `inv_w` holds each vertex's `1 / w_clip`. Falls back to the linear
/// weights if the correction is not well defined.
#[inline]
pub fn perspective_correct(bc: Vec3, inv_w: [f32; 3]) -> Vec3 {
    let corrected = Vec3::new(bc.x * inv_w[0], bc.y * inv_w[1], bc.z * inv_w[2]);
    let sum = corrected.x + corrected.y + corrected.z;
    if sum > 0.0 && sum.is_finite() {
        corrected / sum
    } else {
        bc
    }
}

/// Triangle rasterizer using the incremental edge function algorithm.
///
/// The rasterizer is stateless apart from its sub-pixel precision; it writes
/// into whatever [`FrameBuffer`] it is given and calls the shader's `vary`
/// and `fragment` stages for every pixel that passes the depth test.
#[derive(Clone, Copy, Debug)]
pub struct EdgeFunctionRasterizer {
    precision: i64,
}

impl EdgeFunctionRasterizer {
    /// Creates a rasterizer with [`SUBPIXEL_PRECISION`] steps per pixel.
    pub fn new() -> Self {
        Self::with_precision(SUBPIXEL_PRECISION)
    }

    /// Creates a rasterizer with `precision` sub-pixel steps per pixel.
    ///
    /// # Panics
    /// Panics unless `precision` is an even number of at least 2, so pixel
    /// centers fall exactly on the fixed-point grid.
    pub fn with_precision(precision: i64) -> Self {
        assert!(
            precision >= 2 && precision % 2 == 0,
            "sub-pixel precision must be even and >= 2, got {precision}"
        );
        Self { precision }
    }

    /// Rasterize one screen-space triangle with depth testing.
    ///
    /// The vertices must already have gone through
    /// [`Shader::post_process`]. Returns the number of pixels written.
    pub fn draw_triangle<S: Shader>(
        &self,
        vertices: [&Varying; 3],
        shader: &S,
        target: &mut FrameBuffer,
    ) -> usize {
        let [v0, v1, v2] = vertices;
        let prec = self.precision;
        let fprec = prec as f32;

        // ─────────────────────────────────────────────────────────────────────
        // Step 1: Snap to the fixed-point grid
        // ─────────────────────────────────────────────────────────────────────
        let (Some(p0), Some(p1), Some(p2)) = (
            FixedPoint::snap(v0, fprec),
            FixedPoint::snap(v1, fprec),
            FixedPoint::snap(v2, fprec),
        ) else {
            trace!("Skipping triangle outside the guard band");
            return 0;
        };

        // ─────────────────────────────────────────────────────────────────────
        // Step 2: Signed area; back-facing and degenerate triangles cover nothing
        // ─────────────────────────────────────────────────────────────────────
        let area = edge(p0, p1, p2);
        if area <= 0 {
            return 0;
        }
        let inv_area = 1.0 / area as f32;

        // ─────────────────────────────────────────────────────────────────────
        // Step 3: Bounding box, clamped to the viewport
        // ─────────────────────────────────────────────────────────────────────
        let min_x = p0.x.min(p1.x).min(p2.x).div_euclid(prec).max(0);
        let min_y = p0.y.min(p1.y).min(p2.y).div_euclid(prec).max(0);
        let max_x = p0.x.max(p1.x).max(p2.x).div_euclid(prec).min(target.width() as i64 - 1);
        let max_y = p0.y.max(p1.y).max(p2.y).div_euclid(prec).min(target.height() as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return 0;
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 4: Seed edge values at the first pixel center, with fill bias
        // ─────────────────────────────────────────────────────────────────────
        let origin = FixedPoint {
            x: min_x * prec + prec / 2,
            y: min_y * prec + prec / 2,
        };
        let edges = [(p1, p2), (p2, p0), (p0, p1)];
        let bias = edges.map(|(a, b)| i64::from(is_top_left(a, b)));
        let step_x = edges.map(|(a, b)| -(b.y - a.y) * prec);
        let step_y = edges.map(|(a, b)| (b.x - a.x) * prec);
        let mut row = [0i64; 3];
        for i in 0..3 {
            row[i] = edge(edges[i].0, edges[i].1, origin) + bias[i];
        }

        let z = Vec3::new(v0.position.z, v1.position.z, v2.position.z);
        let inv_w = [v0.position.w, v1.position.w, v2.position.w];

        // ─────────────────────────────────────────────────────────────────────
        // Step 5: Scan the box top-to-bottom, left-to-right
        // ─────────────────────────────────────────────────────────────────────
        let mut written = 0;
        for y in min_y..=max_y {
            let mut w = row;

            for x in min_x..=max_x {
                if w[0] > 0 && w[1] > 0 && w[2] > 0 {
                    let bc = Vec3::new(
                        (w[0] - bias[0]) as f32 * inv_area,
                        (w[1] - bias[1]) as f32 * inv_area,
                        (w[2] - bias[2]) as f32 * inv_area,
                    );
                    let depth = bc.dot(z);

                    let (px, py) = (x as usize, y as usize);
                    let cell = target.depth.at_mut(px, py);
                    if depth < *cell {
                        *cell = depth;
                        let varying = shader.vary(perspective_correct(bc, inv_w), v0, v1, v2);
                        *target.color.at_mut(px, py) = shader.fragment(&varying);
                        written += 1;
                    }
                }

                for i in 0..3 {
                    w[i] += step_x[i];
                }
            }

            for i in 0..3 {
                row[i] += step_y[i];
            }
        }

        written
    }
}

impl Default for EdgeFunctionRasterizer {
    fn default() -> Self {
        Self::new()
    }
}
