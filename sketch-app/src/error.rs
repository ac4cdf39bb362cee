//! Client-side error types.

use reqwest::StatusCode;
use sketch_renderer::RenderError;
use thiserror::Error;

/// Errors talking to the history server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL is invalid.
    #[error("invalid history URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("history request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server rejected the input (400).
    #[error("history request rejected: {0}")]
    Validation(String),
    /// The server could not read or write the history (500).
    #[error("history storage failed: {0}")]
    Persistence(String),
    /// Any other status or an unreadable body.
    #[error("unexpected history response ({status}): {message}")]
    UnexpectedResponse {
        /// HTTP status returned.
        status: StatusCode,
        /// Message or body text.
        message: String,
    },
}

impl ClientError {
    /// Whether re-invoking the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Persistence(_))
    }
}

/// Errors from the drawing pad.
#[derive(Debug, Error)]
pub enum PadError {
    /// No surface has been mounted yet.
    #[error("canvas not mounted")]
    NotMounted,
    /// Surface allocation or encoding failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors from the save workflow.
#[derive(Debug, Error)]
pub enum SaveError {
    /// No signed-in user.
    #[error("no user signed in")]
    NoIdentity,
    /// The drawing could not be serialized.
    #[error(transparent)]
    Pad(#[from] PadError),
    /// The server call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}
