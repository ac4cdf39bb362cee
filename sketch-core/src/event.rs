//! Pointer input events for the drawing surface.
//!
//! Mouse and touch events arrive in different shapes. They are wrapped in a
//! single [`PointerSource`] so the coordinate resolver is the only place that
//! cares which device produced the event.

use serde::{Deserialize, Serialize};

/// Phase of a pointer interaction, independent of the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed or finger placed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// Pointer left the drawing region.
    Leave,
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

impl From<TouchPhase> for PointerPhase {
    fn from(phase: TouchPhase) -> Self {
        match phase {
            TouchPhase::Start => Self::Down,
            TouchPhase::Move => Self::Move,
            TouchPhase::End => Self::Up,
            TouchPhase::Cancel => Self::Leave,
        }
    }
}

/// A single touch point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position relative to the viewport.
    pub client_x: f32,
    /// Y position relative to the viewport.
    pub client_y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub fn new(id: u32, client_x: f32, client_y: f32) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// A touch event with zero or more active touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All currently active touch points.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Device-specific payload of a pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PointerSource {
    /// Mouse event, already carrying canvas-local offsets.
    Mouse {
        /// X offset from the canvas origin.
        offset_x: f32,
        /// Y offset from the canvas origin.
        offset_y: f32,
    },

    /// Touch event with viewport coordinates.
    Touch(TouchEvent),
}

/// A raw pointer event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// What happened.
    pub phase: PointerPhase,
    /// Device payload.
    pub source: PointerSource,
}

impl PointerEvent {
    /// Create a mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, offset_x: f32, offset_y: f32) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse { offset_x, offset_y },
        }
    }

    /// Create a pointer event from a touch event, deriving the phase.
    #[must_use]
    pub fn touch(touch: TouchEvent) -> Self {
        Self {
            phase: touch.phase.into(),
            source: PointerSource::Touch(touch),
        }
    }

    /// Whether the event came from a touch device.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self.source, PointerSource::Touch(_))
    }
}
