//! Arcball camera
//!
//! # Coordinate System
//!
//! Uses a **right-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer (the camera looks down -Z)
//!
//! # Orbiting
//!
//! The camera always looks at a fixed target point. Pointer deltas rotate
//! the camera position around that target: horizontal motion about the
//! world up vector, vertical motion about the camera's right axis. The
//! distance to the target only changes through [`ArcballCamera::zoom`].

use crate::math::{Mat4, Vec2, Vec3, Vec4};

/// Radians of rotation per pixel of pointer motion.
const LOOK_SENSITIVITY: f32 = 0.01;

/// Vertical orbit is refused once the view direction is this close to
/// the up vector, where `look_at` degenerates.
const POLE_LIMIT: f32 = 0.999;

/// Camera orbiting a target point, with an eagerly rebuilt view matrix.
#[derive(Debug, Clone)]
pub struct ArcballCamera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    view: Mat4,
    look_sensitivity: f32,
}

impl ArcballCamera {
    /// Creates a camera at `position` looking at `target`, with +Y up.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self::with_up(position, target, Vec3::UP)
    }

    pub fn with_up(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            view: Mat4::look_at_rh(position, target, up),
            look_sensitivity: LOOK_SENSITIVITY,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Orbit around the target by a pointer delta in pixels.
    ///
    /// Vertical motion counts half as much as horizontal motion.
    pub fn orbit(&mut self, delta: Vec2) {
        let yaw = delta.x * self.look_sensitivity;
        let pitch = delta.y * self.look_sensitivity / 2.0;

        let offset = self.position - self.target;
        let mut rotation = Mat4::rotation_axis(self.up, yaw);

        let right = self.view.row3(0);
        let pitched = rotation * Mat4::rotation_axis(right, pitch);
        let forward = -(pitched * Vec4::from_vec3(offset, 0.0)).xyz().normalize();
        if forward.dot(self.up).abs() <= POLE_LIMIT {
            rotation = pitched;
        }

        let offset = (rotation * Vec4::from_vec3(offset, 0.0)).xyz();
        self.position = self.target + offset;
        self.update_view();
    }

    /// Step the camera toward (`direction <= 0`) or away from
    /// (`direction > 0`) the target.
    pub fn zoom(&mut self, direction: i32) {
        let factor = if direction > 0 { 1.1 } else { 0.9 };
        self.position = self.target + (self.position - self.target) * factor;
        self.update_view();
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }
}

impl Default for ArcballCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO)
    }
}
