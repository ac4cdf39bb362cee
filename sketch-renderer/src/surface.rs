//! Raster canvas surface.
//!
//! Each `line_to` strokes only the segment from the previous point, so a
//! stroke is visible while it is still being drawn.

use sketch_core::{DrawingArtifact, DrawingSurface, PointerSample};
use tiny_skia::{Color, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{RenderError, RenderResult};
use crate::SurfaceConfig;

/// An addressable RGBA raster with a fixed stroke style.
pub struct RasterSurface {
    pixmap: Pixmap,
    config: SurfaceConfig,
    paint: Paint<'static>,
    stroke: Stroke,
    cursor: Option<PointerSample>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("path_open", &self.cursor.is_some())
            .finish_non_exhaustive()
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

impl RasterSurface {
    /// Allocate a surface and fill it with the configured background.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the size is zero or too large.
    pub fn new(config: SurfaceConfig) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(config.width, config.height).ok_or_else(|| {
            RenderError::Surface(format!(
                "invalid surface size {}x{}",
                config.width, config.height
            ))
        })?;
        pixmap.fill(color(config.background));

        let mut paint = Paint::default();
        paint.set_color(color(config.stroke_color));
        paint.anti_alias = true;

        let stroke = Stroke {
            width: config.line_width,
            line_cap: config.line_cap.into(),
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        tracing::debug!(
            width = config.width,
            height = config.height,
            "Canvas surface initialized"
        );

        Ok(Self {
            pixmap,
            config,
            paint,
            stroke,
            cursor: None,
        })
    }

    /// Surface with the default 600x400 configuration.
    ///
    /// # Errors
    ///
    /// Never fails for the default size; see [`RasterSurface::new`].
    pub fn with_defaults() -> RenderResult<Self> {
        Self::new(SurfaceConfig::default())
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Configuration the surface was created with.
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Whether a path is currently open.
    #[must_use]
    pub fn is_path_open(&self) -> bool {
        self.cursor.is_some()
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // Pixmap::pixel only checks the flat index, so x past the row end
        // would wrap onto the next row.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight-alpha RGBA bytes, row-major, suitable for browser image data.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode the current contents as a PNG data URI artifact.
    ///
    /// The artifact is a snapshot: drawing after this call does not alter it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if PNG encoding fails.
    pub fn serialize(&self) -> RenderResult<DrawingArtifact> {
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        tracing::debug!(bytes = png.len(), "Canvas serialized");
        Ok(DrawingArtifact::from_png_bytes(&png))
    }

    /// Reset to the background fill and drop any open path.
    pub fn clear(&mut self) {
        self.pixmap.fill(color(self.config.background));
        self.cursor = None;
    }
}

impl DrawingSurface for RasterSurface {
    fn begin_path(&mut self, at: PointerSample) {
        self.cursor = Some(at);
    }

    fn line_to(&mut self, to: PointerSample) {
        let Some(from) = self.cursor else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &self.paint,
                &self.stroke,
                Transform::identity(),
                None,
            );
        }
        self.cursor = Some(to);
    }

    fn close_path(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_artifact;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn surface() -> RasterSurface {
        RasterSurface::with_defaults().expect("surface")
    }

    #[test]
    fn starts_filled_with_background() {
        let s = surface();
        assert_eq!(s.width(), 600);
        assert_eq!(s.height(), 400);
        assert_eq!(s.pixel(0, 0), Some(BLACK));
        assert_eq!(s.pixel(599, 399), Some(BLACK));
        assert_eq!(s.pixel(600, 0), None);
        assert_eq!(s.pixel(0, 400), None);
    }

    #[test]
    fn pixel_past_row_end_does_not_wrap() {
        let mut s = surface();
        s.begin_path(PointerSample::new(0.0, 2.0));
        s.line_to(PointerSample::new(40.0, 2.0));
        s.close_path();
        assert_ne!(s.pixel(1, 1), Some(BLACK));
        assert_eq!(s.pixel(601, 0), None);
    }

    #[test]
    fn zero_size_is_rejected() {
        let result = RasterSurface::new(SurfaceConfig::with_size(0, 10));
        assert!(matches!(result, Err(RenderError::Surface(_))));
    }

    #[test]
    fn segment_is_stroked_white() {
        let mut s = surface();
        s.begin_path(PointerSample::new(10.0, 50.0));
        s.line_to(PointerSample::new(100.0, 50.0));
        s.close_path();

        assert_eq!(s.pixel(50, 50), Some(WHITE));
        // Width 4 does not reach 10 pixels away.
        assert_eq!(s.pixel(50, 60), Some(BLACK));
    }

    #[test]
    fn begin_without_move_leaves_no_mark() {
        let mut s = surface();
        let before = s.to_rgba();
        s.begin_path(PointerSample::new(20.0, 20.0));
        s.close_path();
        assert_eq!(s.to_rgba(), before);
    }

    #[test]
    fn line_without_open_path_is_ignored() {
        let mut s = surface();
        let before = s.to_rgba();
        s.line_to(PointerSample::new(30.0, 30.0));
        assert_eq!(s.to_rgba(), before);
        assert!(!s.is_path_open());
    }

    #[test]
    fn serialize_twice_is_identical() {
        let mut s = surface();
        s.begin_path(PointerSample::new(5.0, 5.0));
        s.line_to(PointerSample::new(200.0, 150.0));

        let a = s.serialize().expect("first");
        let b = s.serialize().expect("second");
        assert_eq!(a, b);

        let decoded_a = decode_artifact(&a).expect("decode a");
        let decoded_b = decode_artifact(&b).expect("decode b");
        assert_eq!(decoded_a.data, decoded_b.data);
    }

    #[test]
    fn snapshot_is_not_affected_by_later_drawing() {
        let mut s = surface();
        let snapshot = s.serialize().expect("snapshot");

        s.begin_path(PointerSample::new(0.0, 200.0));
        s.line_to(PointerSample::new(600.0, 200.0));

        let decoded = decode_artifact(&snapshot).expect("decode");
        assert!(decoded.data.chunks_exact(4).all(|px| px == BLACK));
        assert_ne!(s.serialize().expect("after"), snapshot);
    }

    #[test]
    fn serialized_pixels_match_surface() {
        let mut s = surface();
        s.begin_path(PointerSample::new(300.0, 10.0));
        s.line_to(PointerSample::new(300.0, 390.0));

        let decoded = decode_artifact(&s.serialize().expect("serialize")).expect("decode");
        assert_eq!((decoded.width, decoded.height), (600, 400));
        assert_eq!(decoded.data, s.to_rgba());
    }

    #[test]
    fn clear_restores_background() {
        let mut s = surface();
        s.begin_path(PointerSample::new(0.0, 0.0));
        s.line_to(PointerSample::new(100.0, 100.0));
        s.clear();
        assert!(s.to_rgba().chunks_exact(4).all(|px| px == BLACK));
        assert!(!s.is_path_open());
    }
}
