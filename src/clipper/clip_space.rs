//! Clip-space clipping against the near plane and a guard band.
//!
//! Clipping occurs after projection (in homogeneous clip space), before the
//! perspective divide. The clip volume is defined by:
//!
//! ```text
//! -w <= z                  (near plane, OpenGL-style [-1, 1] depth)
//! W_EPSILON <= w
//! -K*w <= x <= K*w         (guard band, K = GUARD_BAND_SCALE)
//! -K*w <= y <= K*w
//! ```
//!
//! The near plane keeps vertices behind the eye out of the perspective
//! divide. The guard band is much wider than the viewport, so ordinary
//! off-screen geometry is left to the rasterizer's viewport clamp; it only
//! bounds how far outside the screen a clipped vertex can land, which keeps
//! every vertex inside the rasterizer's fixed-point range.

use crate::render::rasterizer::Varying;

/// Smallest clip-space `w` a vertex may have going into the perspective divide.
pub const W_EPSILON: f32 = 1e-5;

/// Half-width of the guard band in NDC units. A surviving vertex lands at
/// most `(GUARD_BAND_SCALE + 1) / 2` viewport widths from the screen origin.
pub const GUARD_BAND_SCALE: f32 = 256.0;

/// Clipping a triangle against N planes adds at most one vertex per plane.
const MAX_VERTICES: usize = 3 + ClipPlane::ALL.len();

/// The planes a triangle is clipped against.
///
/// Each plane is defined implicitly by a linear inequality on (x, y, z, w).
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipPlane {
    /// Near plane: z >= -w
    Near,
    /// Positive w: w >= W_EPSILON
    W,
    /// Guard band left: x >= -K*w
    Left,
    /// Guard band right: x <= K*w
    Right,
    /// Guard band bottom: y >= -K*w
    Bottom,
    /// Guard band top: y <= K*w
    Top,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Near,
        ClipPlane::W,
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
    ];

    /// Returns the signed distance from a vertex to this plane.
    /// Positive = inside the clip volume, Negative = outside.
    #[inline]
    pub fn signed_distance(self, v: &Varying) -> f32 {
        let p = v.position;
        let band = GUARD_BAND_SCALE * p.w;
        match self {
            Self::Near => p.w + p.z,
            Self::W => p.w - W_EPSILON,
            Self::Left => band + p.x,
            Self::Right => band - p.x,
            Self::Bottom => band + p.y,
            Self::Top => band - p.y,
        }
    }
}

/// The convex polygon left after clipping one triangle.
///
/// Holds 0 (fully clipped) or 3 to `MAX_VERTICES` vertices and never
/// allocates.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClippedPolygon {
    vertices: [Varying; MAX_VERTICES],
    len: usize,
}

impl ClippedPolygon {
    fn from_triangle(triangle: [Varying; 3]) -> Self {
        let mut polygon = Self::default();
        for v in triangle {
            polygon.push(v);
        }
        polygon
    }

    fn push(&mut self, v: Varying) {
        debug_assert!(self.len < MAX_VERTICES);
        self.vertices[self.len] = v;
        self.len += 1;
    }

    pub fn vertices(&self) -> &[Varying] {
        &self.vertices[..self.len]
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.len < 3
    }

    /// Clip this polygon against a single plane using the Sutherland-Hodgman
    /// algorithm.
    fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        let mut output = Self::default();
        let vertices = self.vertices();

        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % vertices.len()];

            let d1 = plane.signed_distance(current);
            let d2 = plane.signed_distance(next);

            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(*current);

                if !next_inside {
                    // Going from inside to outside, add intersection
                    let t = d1 / (d1 - d2);
                    output.push(current.lerp(next, t));
                }
            } else if next_inside {
                // Going from outside to inside, add intersection
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
        }

        if output.is_empty() {
            output.len = 0;
        }
        output
    }

    /// Triangulate this convex polygon using fan triangulation.
    ///
    /// Winding order of the input triangle is preserved, so back-face
    /// culling in the rasterizer still works on the pieces.
    pub fn triangles(&self) -> impl Iterator<Item = [Varying; 3]> + '_ {
        let v = self.vertices();
        (1..v.len().saturating_sub(1)).map(move |i| [v[0], v[i], v[i + 1]])
    }
}

/// Clip a clip-space triangle against the near plane and the guard band.
///
/// Attributes of new vertices are interpolated linearly in clip space,
/// which is correct because clip space is still affine.
pub fn clip_triangle(triangle: [Varying; 3]) -> ClippedPolygon {
    let mut polygon = ClippedPolygon::from_triangle(triangle);

    for plane in ClipPlane::ALL {
        if polygon.is_empty() {
            break;
        }
        // Common case: nothing crosses the plane.
        if polygon
            .vertices()
            .iter()
            .all(|v| plane.signed_distance(v) >= 0.0)
        {
            continue;
        }
        polygon = polygon.clip_against_plane(plane);
    }

    polygon
}
