//! Decoding drawing artifacts back into pixels.
//!
//! Used by the gallery to display saved drawings and by tests to compare
//! raster content.

use sketch_core::DrawingArtifact;

use crate::error::{RenderError, RenderResult};

/// Decoded artifact pixels.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
    /// Format of the encoded payload.
    pub format: ImageFormat,
}

impl RasterImage {
    /// Whether both images have identical dimensions and pixels.
    #[must_use]
    pub fn same_pixels(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

/// Encoded image formats. Surfaces only ever serialize PNG, and only PNG
/// decoding is compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// Any other format; not decodable.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.eq_ignore_ascii_case("image/png") {
            Self::Png
        } else {
            Self::Unknown
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else {
            Self::Unknown
        }
    }
}

/// Decode an artifact's payload into RGBA pixels.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the artifact is not a base64 data URI,
/// if the payload is not PNG, if the declared MIME type is not PNG, or if the
/// image cannot be decoded.
pub fn decode_artifact(artifact: &DrawingArtifact) -> RenderResult<RasterImage> {
    let bytes = artifact
        .decode_bytes()
        .map_err(|e| RenderError::Decode(e.to_string()))?;
    let format = ImageFormat::from_magic_bytes(&bytes);
    if format == ImageFormat::Unknown {
        return Err(RenderError::Decode("unsupported image format".into()));
    }

    if let Some(mime) = artifact.mime_type() {
        if ImageFormat::from_mime(mime) != format {
            return Err(RenderError::Decode(format!(
                "declared {mime} but payload is {format:?}"
            )));
        }
    }

    let img = image::load_from_memory(&bytes)
        .map_err(|e| RenderError::Decode(format!("Failed to decode image: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(RasterImage {
        width,
        height,
        data: rgba.into_raw(),
        format,
    })
}
