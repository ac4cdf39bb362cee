//! # DrawMotion Client
//!
//! The drawing pad, the history client and the gallery view. On `wasm32`
//! the `wasm` module binds them to a `<canvas>` element.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web sketch-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { WebSketchPad } from './pkg/sketch_app.js';
//!
//! await init();
//! const pad = new WebSketchPad('drawing-canvas', 'http://localhost:5000');
//! canvas.addEventListener('mousedown', (e) => pad.mouseDown(e));
//! canvas.addEventListener('touchstart', (e) => pad.touchStart(e));
//! pad.setOwner(user.sub);
//! await pad.save();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod gallery;
pub mod pad;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use client::HistoryClient;
pub use error::{ClientError, PadError, SaveError};
pub use gallery::HistoryGallery;
pub use pad::SketchPad;

use sketch_core::{SaveAck, UserIdentity};

/// Serialize the pad and save it for the signed-in user.
///
/// The identity is passed in by the caller; `None` means nobody is signed in.
/// The pad is left untouched whatever the outcome, so a failed save loses
/// nothing on screen.
///
/// # Errors
///
/// Returns [`SaveError::NoIdentity`] without a user, [`SaveError::Pad`] if
/// the drawing cannot be serialized and [`SaveError::Client`] if the server
/// call fails.
pub async fn save_drawing(
    client: &HistoryClient,
    owner: Option<&UserIdentity>,
    pad: &SketchPad,
) -> Result<SaveAck, SaveError> {
    let owner = owner.ok_or(SaveError::NoIdentity)?;
    let artifact = pad.snapshot()?;
    let ack = client.save(owner, &artifact).await?;
    tracing::info!(%owner, bytes = artifact.len(), "Drawing saved");
    Ok(ack)
}
