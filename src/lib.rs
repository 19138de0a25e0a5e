//! A CPU software rasterizer.
//!
//! Triangles go through a programmable [`Shader`](render::Shader), are
//! clipped against the near plane, and are scan-converted with Pineda's edge
//! functions on a fixed-point grid with the top-left fill rule. SDL2 is only
//! used to show the finished image and collect input.
//!
//! # Quick Start
//!
//! ```ignore
//! use pineda::prelude::*;
//!
//! let model = Model::load(Path::new("suzanne.obj"), None, WrapMode::Repeat, SampleMode::Nearest)?;
//! let mut window = Window::new("Pineda", 640, 480)?;
//! Engine::new(EngineConfig::default(), model).run(&mut window)?;
//! ```

pub mod camera;
pub mod clipper;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod render;
pub mod texture;
pub mod window;

pub use error::{RenderError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::ArcballCamera;
    pub use crate::color::Color;
    pub use crate::config::{Args, EngineConfig};
    pub use crate::engine::{DisplayMode, Engine, FrameStats, InputEvent, Surface};
    pub use crate::error::{RenderError, Result};
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};
    pub use crate::mesh::{Mesh, Vertex};
    pub use crate::model::Model;
    pub use crate::projection::Projection;
    pub use crate::render::{
        Buffer, EdgeFunctionRasterizer, FrameBuffer, Shader, StandardShader, Uniforms, Varying,
        Viewport,
    };
    pub use crate::texture::{SampleMode, Texture, WrapMode};
    pub use crate::window::Window;
}
