//! Save and fetch operations over a [`HistoryStore`].
//!
//! Validation runs before any storage access. Store calls may block on disk
//! I/O, so they run on the blocking pool and only the calling task suspends.

use std::sync::Arc;

use sketch_core::{
    DrawingArtifact, HistoryEntry, HistoryStore, LocalHistoryStore, SaveRequest, StoreError,
    UserIdentity,
};
use thiserror::Error;
use uuid::Uuid;

use crate::validation::{validate_image, validate_owner_id, ValidationError};

/// Errors surfaced by save and fetch.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The caller supplied incomplete or invalid input.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// The store could not complete the read or write.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Shared history service used by the HTTP handlers.
#[derive(Debug, Clone)]
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(Arc::new(LocalHistoryStore::new()))
    }
}

impl HistoryService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Validate and persist one drawing.
    ///
    /// Creates exactly one entry on success and none on failure.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Validation`] before touching the store when a
    /// field is missing or invalid, and [`HistoryError::Persistence`] when the
    /// append fails.
    #[tracing::instrument(name = "history_save", skip(self, request))]
    pub async fn save(&self, request: SaveRequest) -> Result<Uuid, HistoryError> {
        let owner = validate_owner_id(request.owner())?;
        let artifact = validate_image(request.image)?;
        let bytes = artifact.len();

        let entry = HistoryEntry::new(owner, artifact);
        let id = entry.id;
        let store = Arc::clone(&self.store);
        run_blocking(move || store.append(entry)).await?;

        tracing::info!(%id, bytes, "Drawing saved");
        Ok(id)
    }

    /// Artifacts of `owner` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Validation`] for an invalid owner and
    /// [`HistoryError::Persistence`] when the store cannot be read.
    #[tracing::instrument(name = "history_fetch", skip(self))]
    pub async fn fetch(&self, owner: &str) -> Result<Vec<DrawingArtifact>, HistoryError> {
        let owner: UserIdentity = validate_owner_id(Some(owner))?;
        let store = Arc::clone(&self.store);
        let artifacts = run_blocking(move || store.artifacts(&owner)).await?;
        tracing::debug!(count = artifacts.len(), "History fetched");
        Ok(artifacts)
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Unavailable(format!("storage task failed: {e}")))?
}
