//! Triangle rasterization.
//!
//! - [`shader`]: the programmable stages and the per-vertex [`Varying`] record
//! - [`edgefunction`]: the fixed-function coverage, depth test and
//!   interpolation loop

pub mod edgefunction;
pub mod shader;

pub use edgefunction::{EdgeFunctionRasterizer, SUBPIXEL_PRECISION};
pub use shader::{Shader, StandardShader, Uniforms, Varying, Viewport};
