//! Input validation for untrusted data.
//!
//! Owner identifiers end up as URL path segments and storage keys, and
//! artifacts are held in memory, so both are bounded here before any
//! persistence attempt.

use sketch_core::{DrawingArtifact, UserIdentity};
use thiserror::Error;

/// Maximum length for owner IDs, in bytes.
pub const MAX_OWNER_ID_LEN: usize = 128;
/// Maximum length for an encoded artifact.
pub const MAX_IMAGE_LEN: usize = 16 * 1024 * 1024; // 16 MiB

/// Validation error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Owner ID absent or blank.
    #[error("ownerId is required")]
    MissingOwnerId,
    /// Owner ID exceeds maximum length.
    #[error("ownerId too long (max {MAX_OWNER_ID_LEN} bytes)")]
    OwnerIdTooLong,
    /// Owner ID contains control characters.
    #[error("ownerId contains invalid characters")]
    OwnerIdInvalidChars,
    /// Image absent or empty.
    #[error("image is required")]
    MissingImage,
    /// Image exceeds maximum length.
    #[error("image too large (max {MAX_IMAGE_LEN} bytes)")]
    ImageTooLarge,
}

impl ValidationError {
    /// Short label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingOwnerId | Self::OwnerIdTooLong | Self::OwnerIdInvalidChars => "owner_id",
            Self::MissingImage | Self::ImageTooLarge => "image",
        }
    }

    /// Whether the error is a missing required field.
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingOwnerId | Self::MissingImage)
    }
}

/// Validate an owner ID.
///
/// Valid owner IDs:
/// - Non-blank
/// - At most 128 bytes
/// - No control characters
///
/// # Errors
///
/// Returns [`ValidationError::MissingOwnerId`] for absent or blank input,
/// [`ValidationError::OwnerIdTooLong`] or
/// [`ValidationError::OwnerIdInvalidChars`] otherwise.
pub fn validate_owner_id(id: Option<&str>) -> Result<UserIdentity, ValidationError> {
    let id = id.ok_or(ValidationError::MissingOwnerId)?;
    if id.trim().is_empty() {
        return Err(ValidationError::MissingOwnerId);
    }
    if id.len() > MAX_OWNER_ID_LEN {
        return Err(ValidationError::OwnerIdTooLong);
    }
    if id.chars().any(char::is_control) {
        return Err(ValidationError::OwnerIdInvalidChars);
    }
    Ok(UserIdentity::new(id))
}

/// Validate an encoded image.
///
/// The payload is treated as opaque; only presence and size are checked.
///
/// # Errors
///
/// Returns [`ValidationError::MissingImage`] for absent or empty input and
/// [`ValidationError::ImageTooLarge`] above [`MAX_IMAGE_LEN`].
pub fn validate_image(image: Option<String>) -> Result<DrawingArtifact, ValidationError> {
    let image = image.ok_or(ValidationError::MissingImage)?;
    if image.is_empty() {
        return Err(ValidationError::MissingImage);
    }
    if image.len() > MAX_IMAGE_LEN {
        return Err(ValidationError::ImageTooLarge);
    }
    Ok(DrawingArtifact::new(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_owner_ids() {
        assert!(validate_owner_id(Some("u1")).is_ok());
        assert!(validate_owner_id(Some("google-oauth2|1234567890")).is_ok());
        assert!(validate_owner_id(Some("user@example.com")).is_ok());
        assert!(validate_owner_id(Some(&"a".repeat(MAX_OWNER_ID_LEN))).is_ok());
    }

    #[test]
    fn missing_or_blank_owner_ids() {
        assert_eq!(
            validate_owner_id(None),
            Err(ValidationError::MissingOwnerId)
        );
        assert_eq!(
            validate_owner_id(Some("")),
            Err(ValidationError::MissingOwnerId)
        );
        assert_eq!(
            validate_owner_id(Some("   ")),
            Err(ValidationError::MissingOwnerId)
        );
    }

    #[test]
    fn invalid_owner_ids() {
        assert_eq!(
            validate_owner_id(Some(&"a".repeat(MAX_OWNER_ID_LEN + 1))),
            Err(ValidationError::OwnerIdTooLong)
        );
        assert_eq!(
            validate_owner_id(Some("line\nbreak")),
            Err(ValidationError::OwnerIdInvalidChars)
        );
        assert_eq!(
            validate_owner_id(Some("nul\0")),
            Err(ValidationError::OwnerIdInvalidChars)
        );
    }

    #[test]
    fn image_presence_and_size() {
        assert!(validate_image(Some("data:image/png;base64,AA".into())).is_ok());
        assert_eq!(validate_image(None), Err(ValidationError::MissingImage));
        assert_eq!(
            validate_image(Some(String::new())),
            Err(ValidationError::MissingImage)
        );
        assert_eq!(
            validate_image(Some("x".repeat(MAX_IMAGE_LEN + 1))),
            Err(ValidationError::ImageTooLarge)
        );
    }

    #[test]
    fn error_kinds() {
        assert_eq!(ValidationError::OwnerIdTooLong.kind(), "owner_id");
        assert_eq!(ValidationError::ImageTooLarge.kind(), "image");
        assert!(ValidationError::MissingImage.is_missing_field());
        assert!(!ValidationError::ImageTooLarge.is_missing_field());
    }
}
