//! Programmable shader stages.
//!
//! This module splits per-vertex and per-pixel work from the fixed-function
//! rasterizer, the way GPUs separate the rasterizer from programmable
//! vertex and fragment shaders.
//!
//! # Architecture
//!
//! For every vertex the pipeline runs:
//! 1. [`Shader::vertex`]: model space to clip space
//! 2. [`Shader::post_process`]: perspective divide and viewport transform
//!
//! For every covered pixel the rasterizer runs:
//! 3. [`Shader::vary`]: barycentric interpolation of the three varyings
//! 4. [`Shader::fragment`]: final color
//!
//! The rasterizer is generic over the shader, so stage calls are resolved
//! at compile time rather than through a vtable in the per-pixel loop.

use crate::color::Color;
use crate::math::{Mat4, Vec2, Vec3, Vec4};
use crate::mesh::Vertex;
use crate::texture::Texture;

/// Attributes carried from the vertex stage to the fragment stage.
///
/// After [`Shader::post_process`], `position` holds screen-space `x, y`,
/// NDC `z`, and `1 / w_clip` in its `w` component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Varying {
    pub position: Vec4,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Varying {
    /// Field-wise weighted sum `bc.x * v0 + bc.y * v1 + bc.z * v2`.
    ///
    /// The weights must already sum to 1.
    #[inline]
    pub fn interpolate(bc: Vec3, v0: &Varying, v1: &Varying, v2: &Varying) -> Varying {
        Varying {
            position: v0.position * bc.x + v1.position * bc.y + v2.position * bc.z,
            normal: v0.normal * bc.x + v1.normal * bc.y + v2.normal * bc.z,
            uv: v0.uv * bc.x + v1.uv * bc.y + v2.uv * bc.z,
        }
    }

    /// Linearly interpolate every field between two varyings.
    /// Used when a triangle edge crosses a clipping plane.
    pub fn lerp(&self, other: &Varying, t: f32) -> Varying {
        Varying {
            position: self.position.lerp(other.position, t),
            normal: self.normal + (other.normal - self.normal) * t,
            uv: self.uv + (other.uv - self.uv) * t,
        }
    }
}

/// Output image size used by the viewport transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Clip space to screen space, in place.
    ///
    /// Stores `1 / w` in `position.w`, scales `x, y, z` by it, then maps NDC
    /// `x, y` from `[-1, 1]` to `[0, width] x [0, height]` with y pointing down.
    #[inline]
    pub fn apply(&self, v: &mut Varying) {
        let p = &mut v.position;
        p.w = 1.0 / p.w;
        p.x *= p.w;
        p.y *= p.w;
        p.z *= p.w;

        p.x = (p.x + 1.0) / 2.0 * self.width;
        p.y = (1.0 - p.y) / 2.0 * self.height;
    }
}

/// Per-frame shader inputs.
#[derive(Clone, Copy, Debug)]
pub struct Uniforms<'a> {
    /// Model-view-projection matrix.
    pub mvp: Mat4,
    /// Diffuse texture, if the model has one.
    pub texture: Option<&'a Texture>,
}

/// The four-stage shader contract.
pub trait Shader {
    /// Transform a mesh vertex into clip space.
    fn vertex(&self, vertex: &Vertex) -> Varying;

    /// Perspective divide and viewport transform, in place.
    fn post_process(&self, varying: &mut Varying);

    /// Interpolate the varyings of a triangle at barycentric weights `bc`.
    ///
    /// # Arguments
    /// * `bc` - Weights for `v0, v1, v2` that sum to 1.0
    #[inline]
    fn vary(&self, bc: Vec3, v0: &Varying, v1: &Varying, v2: &Varying) -> Varying {
        Varying::interpolate(bc, v0, v1, v2)
    }

    /// Compute the color of a covered pixel.
    fn fragment(&self, varying: &Varying) -> Color;
}

/// MVP transform plus an optional diffuse texture lookup.
///
/// Untextured geometry is drawn opaque white.
pub struct StandardShader<'a> {
    viewport: Viewport,
    pub uniforms: Uniforms<'a>,
}

impl<'a> StandardShader<'a> {
    pub fn new(viewport: Viewport, uniforms: Uniforms<'a>) -> Self {
        Self { viewport, uniforms }
    }
}

impl Shader for StandardShader<'_> {
    #[inline]
    fn vertex(&self, vertex: &Vertex) -> Varying {
        Varying {
            position: self.uniforms.mvp * Vec4::from_vec3(vertex.position, 1.0),
            normal: vertex.normal,
            uv: vertex.uv,
        }
    }

    #[inline]
    fn post_process(&self, varying: &mut Varying) {
        self.viewport.apply(varying);
    }

    #[inline]
    fn fragment(&self, varying: &Varying) -> Color {
        match self.uniforms.texture {
            Some(texture) => texture.sample(varying.uv),
            None => Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ArcballCamera;
    use crate::projection::Projection;
    use approx::assert_relative_eq;

    fn vertex_at(position: Vec3) -> Vertex {
        Vertex {
            position,
            normal: Vec3::new(0.0, 0.0, 1.0),
            uv: Vec2::new(0.25, 0.75),
        }
    }

    #[test]
    fn vertex_stage_transforms_position_and_copies_attributes() {
        let shader = StandardShader::new(
            Viewport::new(10, 10),
            Uniforms {
                mvp: Mat4::translation(1.0, 2.0, 3.0),
                texture: None,
            },
        );
        let v = shader.vertex(&vertex_at(Vec3::ONE));
        assert_eq!(v.position, Vec4::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(v.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(v.uv, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn post_process_divides_and_maps_to_pixels() {
        let viewport = Viewport::new(200, 100);
        let mut v = Varying {
            position: Vec4::new(-2.0, 2.0, 1.0, 2.0),
            ..Varying::default()
        };
        viewport.apply(&mut v);
        // NDC (-1, 1) is the top-left corner.
        assert_relative_eq!(v.position.x, 0.0);
        assert_relative_eq!(v.position.y, 0.0);
        assert_relative_eq!(v.position.z, 0.5);
        assert_relative_eq!(v.position.w, 0.5);
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let (width, height) = (640, 480);
        let camera = ArcballCamera::new(Vec3::new(1.0, 2.0, 4.0), Vec3::new(0.5, 0.5, 0.0));
        let projection = Projection::from_degrees(90.0, width as f32 / height as f32, 0.1, 100.0);
        let shader = StandardShader::new(
            Viewport::new(width, height),
            Uniforms {
                mvp: projection.matrix() * camera.view_matrix(),
                texture: None,
            },
        );

        let mut v = shader.vertex(&vertex_at(camera.target()));
        shader.post_process(&mut v);
        assert_relative_eq!(v.position.x, 320.0, epsilon = 1e-3);
        assert_relative_eq!(v.position.y, 240.0, epsilon = 1e-3);
    }

    #[test]
    fn vary_is_a_weighted_sum() {
        let shader = StandardShader::new(
            Viewport::new(1, 1),
            Uniforms {
                mvp: Mat4::identity(),
                texture: None,
            },
        );
        let v0 = Varying {
            position: Vec4::new(0.0, 0.0, 1.0, 1.0),
            normal: Vec3::new(1.0, 0.0, 0.0),
            uv: Vec2::new(0.0, 0.0),
        };
        let v1 = Varying {
            position: Vec4::new(4.0, 0.0, 3.0, 1.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            uv: Vec2::new(1.0, 0.0),
        };
        let v2 = Varying {
            position: Vec4::new(0.0, 8.0, 5.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            uv: Vec2::new(0.0, 1.0),
        };
        let out = shader.vary(Vec3::new(0.5, 0.25, 0.25), &v0, &v1, &v2);
        assert_relative_eq!(out.position.x, 1.0);
        assert_relative_eq!(out.position.y, 2.0);
        assert_relative_eq!(out.position.z, 2.5);
        assert_relative_eq!(out.position.w, 1.0);
        assert_eq!(out.normal, Vec3::new(0.5, 0.25, 0.25));
        assert_eq!(out.uv, Vec2::new(0.25, 0.25));
    }

    #[test]
    fn fragment_samples_texture_or_falls_back_to_white() {
        let texture = Texture::new(1, 1, 3, vec![9, 8, 7]).unwrap();
        let mut shader = StandardShader::new(
            Viewport::new(1, 1),
            Uniforms {
                mvp: Mat4::identity(),
                texture: None,
            },
        );
        assert_eq!(shader.fragment(&Varying::default()), Color::WHITE);

        shader.uniforms.texture = Some(&texture);
        assert_eq!(shader.fragment(&Varying::default()), Color::rgb(9, 8, 7));
    }
}
