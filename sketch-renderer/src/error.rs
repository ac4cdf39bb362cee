//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur on the raster surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster buffer could not be allocated.
    #[error("Surface creation failed: {0}")]
    Surface(String),

    /// Encoding the buffer into an artifact failed.
    #[error("Artifact encoding failed: {0}")]
    Encode(String),

    /// Decoding an artifact back into pixels failed.
    #[error("Artifact decoding failed: {0}")]
    Decode(String),
}
