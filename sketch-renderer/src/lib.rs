//! # DrawMotion Renderer
//!
//! The canvas surface: an addressable raster buffer with a fixed background
//! and a static stroke style, driven by the stroke capture state machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               RasterSurface                 │
//! ├──────────────────────┬──────────────────────┤
//! │ DrawingSurface impl  │ serialize()          │
//! │ begin / line / close │ PNG -> data URI      │
//! ├──────────────────────┴──────────────────────┤
//! │          tiny-skia Pixmap (RGBA8)           │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod error;
pub mod surface;

pub use artifact::{decode_artifact, ImageFormat, RasterImage};
pub use error::{RenderError, RenderResult};
pub use surface::RasterSurface;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 600;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;

/// Stroke width in canvas units.
pub const LINE_WIDTH: f32 = 4.0;

/// Line cap style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat end at the endpoint.
    Butt,
    /// Semicircle centred on the endpoint.
    #[default]
    Round,
    /// Square extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => Self::Butt,
            LineCap::Round => Self::Round,
            LineCap::Square => Self::Square,
        }
    }
}

/// Static surface configuration.
///
/// Applied once when the surface is created; not adjustable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background fill as RGBA bytes.
    pub background: [u8; 4],
    /// Stroke color as RGBA bytes.
    pub stroke_color: [u8; 4],
    /// Stroke width in canvas units.
    pub line_width: f32,
    /// Line cap.
    pub line_cap: LineCap,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: [0, 0, 0, 255],       // Black
            stroke_color: [255, 255, 255, 255], // White
            line_width: LINE_WIDTH,
            line_cap: LineCap::Round,
        }
    }
}

impl SurfaceConfig {
    /// Default style at a custom size.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}
