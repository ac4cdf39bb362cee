//! Drawing history model.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// MIME type of artifacts produced by the canvas surface.
pub const PNG_MIME: &str = "image/png";

/// Opaque identifier of the user owning a history.
///
/// The core never inspects its structure; it is only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Wrap an identifier issued by the authentication collaborator.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserIdentity {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserIdentity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An encoded, immutable snapshot of the canvas.
///
/// Stored as a text-safe data URI (`data:image/png;base64,...`) so it can
/// travel inside a JSON body and be used directly as an image source.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingArtifact(String);

impl DrawingArtifact {
    /// Wrap already encoded artifact text.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode PNG bytes as a data URI artifact.
    #[must_use]
    pub fn from_png_bytes(png: &[u8]) -> Self {
        Self::from_bytes(PNG_MIME, png)
    }

    /// Encode arbitrary image bytes of the given MIME type.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{payload}"))
    }

    /// The encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the encoded text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the encoded text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MIME type declared by the data URI, if any.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        let meta = self.metadata().ok()?;
        let mime = meta.split(';').next().unwrap_or_default();
        (!mime.is_empty()).then_some(mime)
    }

    /// Decode the base64 payload into raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotDataUri`] or [`CoreError::MissingPayload`] for
    /// malformed text, [`CoreError::UnsupportedEncoding`] when the payload is
    /// not base64, and [`CoreError::Base64`] when decoding fails.
    pub fn decode_bytes(&self) -> CoreResult<Vec<u8>> {
        let meta = self.metadata()?;
        if !meta.split(';').any(|part| part == "base64") {
            return Err(CoreError::UnsupportedEncoding(meta.to_string()));
        }
        let (_, payload) = self.split()?;
        Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
    }

    fn metadata(&self) -> CoreResult<&str> {
        self.split().map(|(meta, _)| meta)
    }

    fn split(&self) -> CoreResult<(&str, &str)> {
        let rest = self.0.strip_prefix("data:").ok_or(CoreError::NotDataUri)?;
        rest.split_once(',').ok_or(CoreError::MissingPayload)
    }
}

impl fmt::Debug for DrawingArtifact {
    // Artifacts can be megabytes of base64; never dump them into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingArtifact")
            .field("mime", &self.mime_type())
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<String> for DrawingArtifact {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

/// One persisted artifact with its owner and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: UserIdentity,
    /// The saved drawing.
    pub artifact: DrawingArtifact,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(owner_id: UserIdentity, artifact: DrawingArtifact) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            artifact,
            created_at: current_timestamp_ms(),
        }
    }
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
