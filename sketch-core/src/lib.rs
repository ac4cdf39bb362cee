//! # DrawMotion Core
//!
//! Core drawing logic: turns raw pointer input into strokes and models the
//! per-user drawing history.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sketch-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Input               │  Stroke Capture      │
//! │  - Mouse / touch     │  - Idle / Drawing    │
//! │  - Coordinate        │  - DrawingSurface    │
//! │    resolution        │    seam              │
//! ├─────────────────────────────────────────────┤
//! │  History Model       │  History Store       │
//! │  - Artifacts         │  - Append-only       │
//! │  - Wire protocol     │  - Optional on disk  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod history;
pub mod protocol;
pub mod resolver;
pub mod store;
pub mod stroke;

pub use error::{CoreError, CoreResult};
pub use event::{PointerEvent, PointerPhase, PointerSource, TouchEvent, TouchPhase, TouchPoint};
pub use history::{DrawingArtifact, HistoryEntry, UserIdentity};
pub use protocol::{ErrorBody, HistoryListing, SaveAck, SaveRequest};
pub use resolver::{resolve_sample, CanvasRect, PointerSample};
pub use store::{HistoryStore, LocalHistoryStore, StoreError};
pub use stroke::{DrawingSurface, StrokeCapture, StrokeOutcome, StrokeState};

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
