//! Polygon clipping.
//!
//! Triangles are clipped in homogeneous clip space against the near plane
//! only (see [`clip_space`]); the rest of the frustum is handled by the
//! rasterizer cropping its bounding box to the viewport.

pub mod clip_space;

pub use clip_space::{clip_triangle, ClippedPolygon, W_EPSILON};
