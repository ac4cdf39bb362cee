//! Coordinate resolution from device events to canvas-local samples.

use serde::{Deserialize, Serialize};

use crate::{PointerSource, TouchEvent};

/// A canvas-local pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// X offset from the canvas origin.
    pub x: f32,
    /// Y offset from the canvas origin.
    pub y: f32,
}

impl PointerSample {
    /// Create a sample.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The degenerate sample used when no canvas is mounted.
    #[must_use]
    pub fn origin() -> Self {
        Self::default()
    }
}

/// The canvas bounding rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    /// Left edge relative to the viewport.
    pub left: f32,
    /// Top edge relative to the viewport.
    pub top: f32,
    /// Width in canvas units.
    pub width: f32,
    /// Height in canvas units.
    pub height: f32,
}

impl CanvasRect {
    /// Create a rectangle.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rectangle anchored at the viewport origin.
    #[must_use]
    pub fn at_origin(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Clamp a sample into `[0, width] x [0, height]`.
    #[must_use]
    pub fn clamp(&self, sample: PointerSample) -> PointerSample {
        PointerSample {
            x: sample.x.max(0.0).min(self.width.max(0.0)),
            y: sample.y.max(0.0).min(self.height.max(0.0)),
        }
    }
}

/// Resolve a device event into a canvas-local sample.
///
/// Mouse offsets pass through. Touch positions are made relative to the
/// canvas origin using only the first active touch. When the canvas is not
/// mounted (`canvas` is `None`) the degenerate `(0, 0)` sample is returned.
///
/// Returns `None` only for a touch event without any active touch point,
/// which carries no coordinate at all.
#[must_use]
pub fn resolve_sample(source: &PointerSource, canvas: Option<&CanvasRect>) -> Option<PointerSample> {
    let Some(rect) = canvas else {
        return Some(PointerSample::origin());
    };

    let raw = match source {
        PointerSource::Mouse { offset_x, offset_y } => PointerSample::new(*offset_x, *offset_y),
        PointerSource::Touch(touch) => resolve_touch(touch, rect)?,
    };

    Some(rect.clamp(raw))
}

fn resolve_touch(touch: &TouchEvent, rect: &CanvasRect) -> Option<PointerSample> {
    let primary = touch.primary_touch()?;
    Some(PointerSample::new(
        primary.client_x - rect.left,
        primary.client_y - rect.top,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TouchPhase, TouchPoint};

    fn rect() -> CanvasRect {
        CanvasRect::new(100.0, 50.0, 600.0, 400.0)
    }

    #[test]
    fn mouse_offsets_pass_through() {
        let source = PointerSource::Mouse {
            offset_x: 12.5,
            offset_y: 30.0,
        };
        assert_eq!(
            resolve_sample(&source, Some(&rect())),
            Some(PointerSample::new(12.5, 30.0))
        );
    }

    #[test]
    fn touch_is_relative_to_canvas_origin() {
        let source = PointerSource::Touch(TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 150.0, 80.0)],
        ));
        assert_eq!(
            resolve_sample(&source, Some(&rect())),
            Some(PointerSample::new(50.0, 30.0))
        );
    }

    #[test]
    fn only_first_touch_is_considered() {
        let source = PointerSource::Touch(TouchEvent::new(
            TouchPhase::Move,
            vec![
                TouchPoint::new(0, 110.0, 60.0),
                TouchPoint::new(1, 500.0, 300.0),
            ],
        ));
        assert_eq!(
            resolve_sample(&source, Some(&rect())),
            Some(PointerSample::new(10.0, 10.0))
        );
    }

    #[test]
    fn unmounted_canvas_yields_origin() {
        let mouse = PointerSource::Mouse {
            offset_x: 42.0,
            offset_y: 17.0,
        };
        let touch = PointerSource::Touch(TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 150.0, 80.0)],
        ));
        assert_eq!(resolve_sample(&mouse, None), Some(PointerSample::origin()));
        assert_eq!(resolve_sample(&touch, None), Some(PointerSample::origin()));
    }

    #[test]
    fn touch_without_points_has_no_sample() {
        let source = PointerSource::Touch(TouchEvent::new(TouchPhase::End, Vec::new()));
        assert_eq!(resolve_sample(&source, Some(&rect())), None);
    }

    #[test]
    fn samples_are_clamped_to_canvas_bounds() {
        let source = PointerSource::Touch(TouchEvent::new(
            TouchPhase::Move,
            vec![TouchPoint::new(0, 20.0, 900.0)],
        ));
        assert_eq!(
            resolve_sample(&source, Some(&rect())),
            Some(PointerSample::new(0.0, 400.0))
        );
    }
}
