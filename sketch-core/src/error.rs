//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Artifact text is not a `data:` URI.
    #[error("Artifact is not a data URI")]
    NotDataUri,

    /// Data URI has no `,` separating metadata from payload.
    #[error("Invalid data URI: missing comma")]
    MissingPayload,

    /// Data URI payload is not base64 encoded.
    #[error("Unsupported artifact encoding: {0}")]
    UnsupportedEncoding(String),

    /// Base64 payload could not be decoded.
    #[error("Failed to decode artifact payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
