//! Stroke capture state machine.
//!
//! Consumes pointer phases and drives a [`DrawingSurface`] through
//! begin / extend / end operations. The machine never fails outward: every
//! failure mode, including a surface that is not yet initialized, degrades to
//! a no-op reported through [`StrokeOutcome`].

use serde::{Deserialize, Serialize};

use crate::{resolve_sample, CanvasRect, PointerEvent, PointerPhase, PointerSample};

/// An imperative surface that strokes are rendered onto.
///
/// Implementations render each segment synchronously inside [`line_to`],
/// using their current stroke style.
///
/// [`line_to`]: DrawingSurface::line_to
pub trait DrawingSurface {
    /// Start a new path at `at`. Nothing is drawn.
    fn begin_path(&mut self, at: PointerSample);

    /// Extend the current path to `to`, rendering the segment from the
    /// previous point.
    fn line_to(&mut self, to: PointerSample);

    /// Close the current path. No segment is appended until the next
    /// [`begin_path`](DrawingSurface::begin_path).
    fn close_path(&mut self);
}

/// Capture state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeState {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing,
}

/// What a single event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// A new path was started.
    Began,
    /// A segment was rendered.
    Segment,
    /// The current stroke was closed.
    Ended,
    /// The event had no effect in the current state.
    Ignored,
    /// The surface is not initialized; the event was dropped.
    SurfaceUnavailable,
}

impl StrokeOutcome {
    /// Whether the surface's pixels may have changed.
    #[must_use]
    pub fn rendered(self) -> bool {
        matches!(self, Self::Segment)
    }
}

/// The stroke capture state machine.
///
/// Long-lived and reusable across any number of strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    state: StrokeState,
    segments_rendered: u64,
    strokes_completed: u64,
}

impl StrokeCapture {
    /// Create an idle state machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StrokeState {
        self.state
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.state == StrokeState::Drawing
    }

    /// Total segments rendered since creation.
    #[must_use]
    pub fn segments_rendered(&self) -> u64 {
        self.segments_rendered
    }

    /// Total strokes closed since creation.
    #[must_use]
    pub fn strokes_completed(&self) -> u64 {
        self.strokes_completed
    }

    /// Resolve a raw event against the canvas rectangle and apply it.
    ///
    /// Coordinates are only resolved for down and move phases.
    pub fn handle_event<S>(
        &mut self,
        surface: Option<&mut S>,
        event: &PointerEvent,
        canvas: Option<&CanvasRect>,
    ) -> StrokeOutcome
    where
        S: DrawingSurface + ?Sized,
    {
        let sample = match event.phase {
            PointerPhase::Down | PointerPhase::Move => resolve_sample(&event.source, canvas),
            PointerPhase::Up | PointerPhase::Leave => None,
        };
        self.handle(surface, event.phase, sample)
    }

    /// Apply a pointer phase with an already resolved sample.
    ///
    /// Down and move phases without a sample are ignored.
    pub fn handle<S>(
        &mut self,
        surface: Option<&mut S>,
        phase: PointerPhase,
        sample: Option<PointerSample>,
    ) -> StrokeOutcome
    where
        S: DrawingSurface + ?Sized,
    {
        let Some(surface) = surface else {
            tracing::trace!(?phase, "surface unavailable, dropping pointer event");
            return StrokeOutcome::SurfaceUnavailable;
        };

        match (self.state, phase) {
            (state, PointerPhase::Down) => {
                let Some(at) = sample else {
                    return StrokeOutcome::Ignored;
                };
                if state == StrokeState::Drawing {
                    surface.close_path();
                    self.strokes_completed += 1;
                }
                surface.begin_path(at);
                self.state = StrokeState::Drawing;
                tracing::debug!(x = at.x, y = at.y, "stroke began");
                StrokeOutcome::Began
            }
            (StrokeState::Drawing, PointerPhase::Move) => {
                let Some(to) = sample else {
                    return StrokeOutcome::Ignored;
                };
                surface.line_to(to);
                self.segments_rendered += 1;
                tracing::trace!(x = to.x, y = to.y, "segment rendered");
                StrokeOutcome::Segment
            }
            (StrokeState::Drawing, PointerPhase::Up | PointerPhase::Leave) => {
                surface.close_path();
                self.state = StrokeState::Idle;
                self.strokes_completed += 1;
                tracing::debug!(?phase, "stroke ended");
                StrokeOutcome::Ended
            }
            (StrokeState::Idle, PointerPhase::Move | PointerPhase::Up | PointerPhase::Leave) => {
                StrokeOutcome::Ignored
            }
        }
    }
}
