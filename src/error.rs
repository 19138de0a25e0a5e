//! Error types.
//!
//! All fatal conditions are detected while loading resources, before the
//! frame loop starts. A texture that fails to decode is not an error: see
//! [`Texture::from_file`](crate::texture::Texture::from_file).

use thiserror::Error;

/// Errors surfaced by resource loading and presentation.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Texel data with a channel layout the sampler cannot index.
    #[error("unsupported texture channel count: {0} (expected 3 or 4)")]
    UnsupportedChannelCount(u8),

    /// Texture with a zero width or height.
    #[error("texture has zero size ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    /// Raw texel buffer whose length does not match its dimensions.
    #[error("texture data is {actual} bytes, expected {expected}")]
    TextureSizeMismatch { expected: usize, actual: usize },

    /// Unreadable mesh source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed geometry description.
    ///
    /// `context` names the source. The OBJ reader reports no line numbers,
    /// so syntax errors point at the file only; faces referencing missing
    /// attributes also carry their object name and face index.
    #[error("failed to parse {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: tobj::LoadError,
    },

    /// A flat triangle list whose length is not a multiple of 3.
    #[error("mesh has {0} vertices, which is not a multiple of 3")]
    MalformedMesh(usize),

    /// Window system or presentation failure.
    #[error("window system error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
