//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::texture::{SampleMode, WrapMode};

/// Fixed camera lens used by the viewer.
const FOV_Y_DEGREES: f32 = 90.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Interactive CPU rasterizer for OBJ meshes", long_about = None)]
pub struct Args {
    /// Path to the OBJ mesh to display
    #[arg(value_name = "MESH")]
    pub mesh: PathBuf,

    /// Optional diffuse texture image
    #[arg(value_name = "TEXTURE")]
    pub texture: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Texture wrap mode
    #[arg(long, value_enum, default_value_t = WrapMode::Repeat)]
    pub wrap: WrapMode,

    /// Texture filter
    #[arg(long, value_enum, default_value_t = SampleMode::Nearest)]
    pub filter: SampleMode,

    /// Uniform model scale
    #[arg(long, default_value_t = 1.5)]
    pub scale: f32,

    /// Initial camera distance from the origin
    #[arg(long, default_value_t = 3.0)]
    pub distance: f32,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width as usize,
            height: self.height as usize,
            model_scale: self.scale,
            camera_distance: self.distance,
            ..EngineConfig::default()
        }
    }
}

/// Everything the frame driver needs besides the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub model_scale: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Distance from the camera to the origin, along +Z.
    pub camera_distance: f32,
}

impl EngineConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            model_scale: 1.5,
            fov_y_degrees: FOV_Y_DEGREES,
            z_near: Z_NEAR,
            z_far: Z_FAR,
            camera_distance: 3.0,
        }
    }
}
