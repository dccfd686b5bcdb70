//! Snapshot persistence seam for the engine state.
//!
//! The hosted database is an external collaborator; these stores are what the
//! engine needs from it (load everything at start, save everything after
//! changes).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::state::SyncState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("snapshot store lock poisoned")]
    LockPoisoned,

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Load/save the whole engine state.
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SyncState>, SnapshotError>;

    fn save(&self, state: &SyncState) -> Result<(), SnapshotError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Option<SyncState>, SnapshotError> {
        (**self).load()
    }

    fn save(&self, state: &SyncState) -> Result<(), SnapshotError> {
        (**self).save(state)
    }
}

/// In-memory snapshot store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    inner: RwLock<Option<SyncState>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<SyncState>, SnapshotError> {
        let guard = self.inner.read().map_err(|_| SnapshotError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &SyncState) -> Result<(), SnapshotError> {
        let mut guard = self.inner.write().map_err(|_| SnapshotError::LockPoisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }
}

/// JSON file snapshot store.
///
/// Saves write a sibling temp file and rename it over the target, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<SyncState>, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let state = serde_json::from_slice(&bytes)?;
        tracing::debug!(path = %self.path.display(), "snapshot loaded");
        Ok(Some(state))
    }

    fn save(&self, state: &SyncState) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
