//! Software rendering back end: render targets and the rasterizer.

pub mod framebuffer;
pub mod rasterizer;

pub use framebuffer::{Buffer, FrameBuffer};
pub use rasterizer::{
    EdgeFunctionRasterizer, Shader, StandardShader, Uniforms, Varying, Viewport,
};
