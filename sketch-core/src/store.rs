//! Shared history storage.
//!
//! Provides the [`HistoryStore`] seam used by the history service and a
//! thread-safe [`LocalHistoryStore`] that keeps every owner's history in
//! memory and, optionally, mirrors it to append-only logs in a data directory.

use std::collections::HashMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use base64::Engine;

use crate::{DrawingArtifact, HistoryEntry, UserIdentity};

/// Extension of persisted history logs (JSON Lines).
const LOG_EXTENSION: &str = "jsonl";

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing storage cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Append-only keyed multi-map from owner to history entries.
///
/// Every `append` is atomic: the entry is either fully stored or not stored
/// at all, and concurrent appends for the same owner never lose entries.
pub trait HistoryStore: Send + Sync + fmt::Debug {
    /// Append an entry to its owner's history.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the entry could not be persisted. Nothing
    /// is stored in that case.
    fn append(&self, entry: HistoryEntry) -> Result<(), StoreError>;

    /// All entries of `owner` in insertion order. Unknown owners have an
    /// empty history.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the storage cannot be read.
    fn entries(&self, owner: &UserIdentity) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Artifacts of `owner` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the storage cannot be read.
    fn artifacts(&self, owner: &UserIdentity) -> Result<Vec<DrawingArtifact>, StoreError> {
        Ok(self
            .entries(owner)?
            .into_iter()
            .map(|entry| entry.artifact)
            .collect())
    }

    /// Cheap availability check used by readiness probes.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot serve requests.
    fn probe(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Thread-safe history storage shared across HTTP handlers.
///
/// The owner map lock is only held long enough to find an owner's slot;
/// appends lock that slot alone, so one owner's disk write never blocks
/// another owner's saves or fetches.
///
/// # Example
///
/// ```
/// use sketch_core::store::{HistoryStore, LocalHistoryStore};
/// use sketch_core::{DrawingArtifact, HistoryEntry, UserIdentity};
///
/// let store = LocalHistoryStore::new();
/// let owner = UserIdentity::new("u1");
/// let entry = HistoryEntry::new(owner.clone(), DrawingArtifact::new("data:image/png;base64,AA"));
///
/// store.append(entry).unwrap();
/// assert_eq!(store.artifacts(&owner).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalHistoryStore {
    histories: Arc<RwLock<HashMap<UserIdentity, OwnerSlot>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

/// One owner's entries. Locked for the duration of an append.
type OwnerSlot = Arc<Mutex<Vec<HistoryEntry>>>;

impl LocalHistoryStore {
    /// Create an in-memory store (no persistence).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with filesystem persistence.
    ///
    /// Each owner's history is an append-only JSON Lines log in `data_dir`.
    /// The directory is created if it doesn't exist and any logs already
    /// present are loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or read.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        let store = Self {
            histories: Arc::new(RwLock::new(HashMap::new())),
            data_dir: Some(data_dir),
        };
        let owners = store.load_all_from_disk()?;
        tracing::info!("Loaded {} persisted histories", owners.len());
        Ok(store)
    }

    /// The data directory, if persistence is enabled.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// All owners with at least one entry.
    #[must_use]
    pub fn owner_ids(&self) -> Vec<UserIdentity> {
        let histories = self
            .histories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        histories
            .iter()
            .filter(|(_, slot)| !lock_slot(slot).is_empty())
            .map(|(owner, _)| owner.clone())
            .collect()
    }

    /// Number of entries stored for `owner`.
    #[must_use]
    pub fn entry_count(&self, owner: &UserIdentity) -> usize {
        self.existing_slot(owner).map_or(0, |slot| {
            let list = lock_slot(&slot);
            list.len()
        })
    }

    fn existing_slot(&self, owner: &UserIdentity) -> Option<OwnerSlot> {
        let histories = self
            .histories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        histories.get(owner).cloned()
    }

    fn slot(&self, owner: &UserIdentity) -> OwnerSlot {
        if let Some(slot) = self.existing_slot(owner) {
            return slot;
        }
        let mut histories = self
            .histories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(histories.entry(owner.clone()).or_default())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Discover and load all persisted histories from the data directory.
    ///
    /// Unreadable logs are skipped with a warning, as are lines that do not
    /// parse (a torn final line after a crash). Returns the owners that were
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured or it can't be read.
    pub fn load_all_from_disk(&self) -> Result<Vec<UserIdentity>, StoreError> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("No data directory configured".into()))?;

        let mut loaded = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == LOG_EXTENSION) {
                continue;
            }
            match read_log(&path) {
                Ok(entries) => {
                    let Some(owner) = entries.first().map(|e| e.owner_id.clone()) else {
                        continue;
                    };
                    let mut histories = self
                        .histories
                        .write()
                        .unwrap_or_else(PoisonError::into_inner);
                    loaded.push(owner.clone());
                    histories.insert(owner, Arc::new(Mutex::new(entries)));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable history {}: {e}", path.display());
                }
            }
        }
        Ok(loaded)
    }
}

impl HistoryStore for LocalHistoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let slot = self.slot(&entry.owner_id);
        // Held across persistence so appends for the same owner are
        // serialized and the log always matches memory.
        let mut list = lock_slot(&slot);

        if let Some(ref dir) = self.data_dir {
            if let Err(err) = append_to_log(dir, &entry) {
                tracing::warn!("Failed to persist history for {}: {err}", entry.owner_id);
                return Err(err);
            }
        }
        list.push(entry);
        Ok(())
    }

    fn entries(&self, owner: &UserIdentity) -> Result<Vec<HistoryEntry>, StoreError> {
        let Some(slot) = self.existing_slot(owner) else {
            return Ok(Vec::new());
        };
        let list = lock_slot(&slot);
        Ok(list.clone())
    }

    fn probe(&self) -> Result<(), StoreError> {
        match self.data_dir {
            Some(ref dir) if !dir.is_dir() => Err(StoreError::Unavailable(format!(
                "data directory {} is missing",
                dir.display()
            ))),
            _ => Ok(()),
        }
    }
}

fn lock_slot(slot: &OwnerSlot) -> MutexGuard<'_, Vec<HistoryEntry>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// File name for an owner's log.
///
/// Owner identifiers are opaque, so they are encoded rather than sanitized to
/// keep distinct owners in distinct files.
fn log_path(data_dir: &Path, owner: &UserIdentity) -> PathBuf {
    let stem = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(owner.as_str());
    data_dir.join(format!("{stem}.{LOG_EXTENSION}"))
}

/// Append one entry as a single line and sync it. On failure the log is
/// truncated back to its previous length so no partial line remains.
fn append_to_log(data_dir: &Path, entry: &HistoryEntry) -> Result<(), StoreError> {
    let mut line =
        serde_json::to_vec(entry).map_err(|e| StoreError::Serialization(e.to_string()))?;
    line.push(b'\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir, &entry.owner_id))?;
    let previous_len = file.metadata()?.len();

    let written = file.write_all(&line).and_then(|()| file.sync_data());
    if let Err(e) = written {
        if let Err(trunc) = file.set_len(previous_len) {
            tracing::warn!("Failed to roll back history log: {trunc}");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Read an owner's log. A torn final line left by a crash is cut off so the
/// next append starts on a fresh line.
fn read_log(path: &Path) -> Result<Vec<HistoryEntry>, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();
    let mut offset = 0;
    let mut valid_len = 0;
    for (number, line) in contents.split_inclusive('\n').enumerate() {
        offset += line.len();
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HistoryEntry>(line) {
            Ok(entry) if line.ends_with('\n') => {
                entries.push(entry);
                valid_len = offset;
            }
            Ok(_) => tracing::warn!("Dropping unterminated last line of {}", path.display()),
            Err(e) => tracing::warn!(
                "Skipping malformed line {} of {}: {e}",
                number + 1,
                path.display()
            ),
        }
    }

    if offset > valid_len && !contents[valid_len..].ends_with('\n') {
        OpenOptions::new()
            .write(true)
            .open(path)?
            .set_len(valid_len as u64)?;
    }
    Ok(entries)
}
