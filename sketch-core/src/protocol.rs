//! Wire types for the history save/fetch protocol.
//!
//! Shared by the server handlers and the HTTP client so both sides agree on
//! field names and messages.

use serde::{Deserialize, Serialize};

use crate::DrawingArtifact;

/// Path prefix under which the history routes are mounted.
pub const HISTORY_PREFIX: &str = "/api/history";

/// Save route, relative to [`HISTORY_PREFIX`].
pub const SAVE_ROUTE: &str = "/save";

/// Acknowledgment message for a successful save.
pub const SAVE_OK_MESSAGE: &str = "Image saved successfully!";

/// Message returned when required save fields are missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Message returned when a save cannot be persisted.
pub const SAVE_FAILED_MESSAGE: &str = "Error saving image";

/// Message returned when a history cannot be read.
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching history";

/// Body of a save request.
///
/// Both fields are optional on the wire so a missing field is reported as a
/// validation failure rather than a deserialization error. Older clients send
/// `userId`; when both are present `ownerId` wins (see [`SaveRequest::owner`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Owner of the drawing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Legacy name for the owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Encoded artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SaveRequest {
    /// Build a complete request.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, artifact: &DrawingArtifact) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            user_id: None,
            image: Some(artifact.as_str().to_string()),
        }
    }

    /// The owner named by the request: `ownerId`, falling back to `userId`.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner_id.as_deref().or(self.user_id.as_deref())
    }
}

/// Acknowledgment of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    /// Human readable message.
    pub message: String,
}

impl Default for SaveAck {
    fn default() -> Self {
        Self {
            message: SAVE_OK_MESSAGE.to_string(),
        }
    }
}

/// Body of a fetch response: artifacts in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryListing {
    /// Encoded artifacts.
    pub history: Vec<DrawingArtifact>,
}

/// Body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub message: String,
}

impl ErrorBody {
    /// Create an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
