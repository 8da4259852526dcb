//! Single-slot hand-off of the latest recommendation between views.
//!
//! The form writes the slot after a successful prediction, the result view
//! reads it on every mount and "retry" clears it. There is one slot and the
//! last writer wins.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use thiserror::Error;

use crate::api::PredictionResult;
use crate::app_dirs;

/// Key of the recommendation slot.
pub const SLOT_KEY: &str = "cropPrediction";

/// Errors raised by slot storage.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("Storage directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read slot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write slot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove slot {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize recommendation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted string key/value storage.
pub trait SlotStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, HandoffError>;
    /// Replace the value for `key`. Readers never observe a partial value.
    fn write(&self, key: &str, value: &str) -> Result<(), HandoffError>;
    fn remove(&self, key: &str) -> Result<(), HandoffError>;
}

/// One JSON file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, HandoffError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HandoffError::Read { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), HandoffError> {
        let path = self.path_for(key);
        let write_err = |source| HandoffError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp.write_all(value.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(&path).map_err(|err| write_err(err.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HandoffError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(HandoffError::Remove { path, source }),
        }
    }
}

/// Process-local storage for tests and headless use.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, HandoffError> {
        let slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), HandoffError> {
        let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HandoffError> {
        let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
        slots.remove(key);
        Ok(())
    }
}

/// Typed access to the recommendation slot.
#[derive(Clone)]
pub struct ResultHandoff {
    store: Arc<dyn SlotStore>,
}

impl std::fmt::Debug for ResultHandoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultHandoff").finish_non_exhaustive()
    }
}

impl ResultHandoff {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Handoff backed by files in the app storage directory.
    pub fn persistent() -> Result<Self, HandoffError> {
        let dir = app_dirs::storage_dir()?;
        Ok(Self::new(Arc::new(FileSlotStore::new(dir))))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlotStore::default()))
    }

    /// Store `result`, overwriting whatever was there.
    pub fn set(&self, result: &PredictionResult) -> Result<(), HandoffError> {
        let json = serde_json::to_string(result)?;
        self.store.write(SLOT_KEY, &json)?;
        tracing::debug!(crop = %result.crop, "recommendation handed off");
        Ok(())
    }

    /// Read the pending recommendation.
    ///
    /// An unreadable slot counts as empty so the result view falls back to
    /// the form instead of failing.
    pub fn get(&self) -> Result<Option<PredictionResult>, HandoffError> {
        let Some(text) = self.store.read(SLOT_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(result) => Ok(Some(result)),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable recommendation slot");
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<(), HandoffError> {
        self.store.remove(SLOT_KEY)?;
        tracing::debug!("recommendation slot cleared");
        Ok(())
    }
}
