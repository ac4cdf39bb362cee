//! History view.
//!
//! Keeps the last successfully fetched list. A failed refresh leaves that
//! list in place and records the error for display.

use sketch_core::{DrawingArtifact, UserIdentity};
use sketch_renderer::{decode_artifact, RasterImage};

use crate::client::HistoryClient;
use crate::error::ClientError;

/// Gallery of an owner's saved drawings.
#[derive(Debug, Default)]
pub struct HistoryGallery {
    artifacts: Vec<DrawingArtifact>,
    last_error: Option<ClientError>,
    loaded: bool,
}

impl HistoryGallery {
    /// Create an empty gallery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts from the last successful fetch, oldest first.
    #[must_use]
    pub fn artifacts(&self) -> &[DrawingArtifact] {
        &self.artifacts
    }

    /// Error from the most recent refresh, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    /// Whether any fetch has succeeded yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the displayed list may be out of date.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    /// Apply the result of a fetch.
    pub fn apply(&mut self, result: Result<Vec<DrawingArtifact>, ClientError>) {
        match result {
            Ok(artifacts) => {
                self.artifacts = artifacts;
                self.last_error = None;
                self.loaded = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "History refresh failed; keeping previous list");
                self.last_error = Some(err);
            }
        }
    }

    /// Fetch `owner`'s history and apply it. Returns whether it succeeded.
    pub async fn refresh(&mut self, client: &HistoryClient, owner: &UserIdentity) -> bool {
        let result = client.fetch(owner).await;
        let ok = result.is_ok();
        self.apply(result);
        ok
    }

    /// Decode every artifact for display, skipping ones that fail to decode.
    #[must_use]
    pub fn images(&self) -> Vec<RasterImage> {
        self.artifacts
            .iter()
            .filter_map(|artifact| match decode_artifact(artifact) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, ?artifact, "Skipping undecodable artifact");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_refresh_keeps_stale_list() {
        let mut gallery = HistoryGallery::new();
        assert!(!gallery.is_loaded());

        gallery.apply(Ok(vec![DrawingArtifact::new("a"), DrawingArtifact::new("b")]));
        assert!(gallery.is_loaded());
        assert_eq!(gallery.artifacts().len(), 2);
        assert!(gallery.last_error().is_none());

        gallery.apply(Err(ClientError::Persistence("Error fetching history".into())));
        assert_eq!(gallery.artifacts().len(), 2);
        assert!(gallery.is_stale());
        assert!(matches!(
            gallery.last_error(),
            Some(ClientError::Persistence(_))
        ));

        gallery.apply(Ok(Vec::new()));
        assert!(gallery.artifacts().is_empty());
        assert!(!gallery.is_stale());
    }

    #[test]
    fn failure_before_first_load_is_empty_not_fatal() {
        let mut gallery = HistoryGallery::new();
        gallery.apply(Err(ClientError::InvalidUrl("x".into())));
        assert!(gallery.artifacts().is_empty());
        assert!(!gallery.is_loaded());
        assert!(gallery.is_stale());
    }

    #[test]
    fn images_skip_undecodable_artifacts() {
        let mut gallery = HistoryGallery::new();
        let surface = sketch_renderer::RasterSurface::new(
            sketch_renderer::SurfaceConfig::with_size(8, 8),
        )
        .expect("surface");
        gallery.apply(Ok(vec![
            surface.serialize().expect("serialize"),
            DrawingArtifact::new("garbage"),
        ]));

        let images = gallery.images();
        assert_eq!(images.len(), 1);
        assert_eq!((images[0].width, images[0].height), (8, 8));
    }
}
