//! The drawing pad: one surface, one stroke state machine.
//!
//! The pad is the single owner of the raster surface. Pointer events route
//! through it; before [`SketchPad::mount`] they are absorbed as no-ops.

use sketch_core::{
    CanvasRect, DrawingArtifact, PointerEvent, StrokeCapture, StrokeOutcome, StrokeState,
};
use sketch_renderer::{RasterSurface, SurfaceConfig};

use crate::error::PadError;

/// Freehand drawing pad.
#[derive(Debug, Default)]
pub struct SketchPad {
    surface: Option<RasterSurface>,
    capture: StrokeCapture,
    canvas: Option<CanvasRect>,
}

impl SketchPad {
    /// Create an unmounted pad.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the surface and place it at `rect` in the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Render`] if the surface cannot be allocated.
    pub fn mount(&mut self, config: SurfaceConfig, rect: CanvasRect) -> Result<(), PadError> {
        self.surface = Some(RasterSurface::new(config)?);
        self.canvas = Some(rect);
        self.capture = StrokeCapture::new();
        Ok(())
    }

    /// Mount a default 600x400 surface at the viewport origin.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Render`] if the surface cannot be allocated.
    pub fn mount_default(&mut self) -> Result<(), PadError> {
        let config = SurfaceConfig::default();
        #[allow(clippy::cast_precision_loss)]
        let rect = CanvasRect::at_origin(config.width as f32, config.height as f32);
        self.mount(config, rect)
    }

    /// Update the canvas bounding rectangle after layout changes.
    pub fn set_canvas_rect(&mut self, rect: CanvasRect) {
        self.canvas = Some(rect);
    }

    /// Whether a surface is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Current stroke state.
    #[must_use]
    pub fn state(&self) -> StrokeState {
        self.capture.state()
    }

    /// Stroke statistics.
    #[must_use]
    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    /// The mounted surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&RasterSurface> {
        self.surface.as_ref()
    }

    /// Route one pointer event through the stroke state machine.
    pub fn handle_event(&mut self, event: &PointerEvent) -> StrokeOutcome {
        self.capture
            .handle_event(self.surface.as_mut(), event, self.canvas.as_ref())
    }

    /// Serialize the current drawing without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::NotMounted`] before mounting and
    /// [`PadError::Render`] if encoding fails.
    pub fn snapshot(&self) -> Result<DrawingArtifact, PadError> {
        let surface = self.surface.as_ref().ok_or(PadError::NotMounted)?;
        Ok(surface.serialize()?)
    }

    /// Wipe the drawing back to the background.
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.capture = StrokeCapture::new();
    }
}
