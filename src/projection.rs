//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for all perspective
//! projection parameters (FOV, aspect ratio, near/far planes) and builds the
//! right-handed, OpenGL-style projection matrix from them.

use crate::math::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near plane distance (must be > 0)
    /// * `z_far` - Far plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Returns the vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Generates the right-handed perspective projection matrix.
    ///
    /// View-space points in front of the camera (negative z) end up with
    /// positive clip-space `w` equal to their distance along the view axis.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, Vec4};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn from_degrees_converts_correctly() {
        let proj = Projection::from_degrees(90.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_y(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn near_and_far_planes_map_to_ndc_bounds() {
        let proj = Projection::from_degrees(90.0, 4.0 / 3.0, 0.1, 100.0);
        let m = proj.matrix();

        let near = m * Vec4::from_vec3(Vec3::new(0.0, 0.0, -0.1), 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-4);
        assert_relative_eq!(near.w, 0.1, epsilon = 1e-6);

        let far = m * Vec4::from_vec3(Vec3::new(0.0, 0.0, -100.0), 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn frustum_edge_maps_to_ndc_edge() {
        // At 90 degrees vertical FOV the top edge at depth d is y = d.
        let proj = Projection::from_degrees(90.0, 2.0, 0.1, 100.0);
        let p = proj.matrix() * Vec4::from_vec3(Vec3::new(6.0, 3.0, -3.0), 1.0);
        assert_relative_eq!(p.x / p.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y / p.w, 1.0, epsilon = 1e-5);
    }
}
