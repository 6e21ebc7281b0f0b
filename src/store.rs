//! # Reference High-Tide Persistence
//!
//! The only state that outlives a session is the reference high tide, kept as
//! epoch milliseconds. The file store writes a single JSON object:
//!
//! ```json
//! {"referenceHighTideEpochMs": 1754932500000}
//! ```
//!
//! A missing file means "no reference yet". A file that exists but cannot be
//! read or decoded is an error; callers decide whether to treat it as absent.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors from loading or saving the reference.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store file operations failed (permissions, disk space)
    #[error("store IO: {0}")]
    Io(#[from] io::Error),

    /// Store contents are not the expected JSON object
    #[error("store format: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for the reference high tide.
pub trait ReferenceStore {
    /// Load the saved reference, `None` when nothing has been saved.
    fn load(&self) -> Result<Option<i64>, StoreError>;

    /// Replace the saved reference.
    fn save(&mut self, epoch_ms: i64) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReference {
    reference_high_tide_epoch_ms: i64,
}

/// Reference store backed by a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceStore for JsonFileStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredReference = serde_json::from_slice(&data)?;
        Ok(Some(stored.reference_high_tide_epoch_ms))
    }

    fn save(&mut self, epoch_ms: i64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec(&StoredReference {
            reference_high_tide_epoch_ms: epoch_ms,
        })?;
        fs::write(&self.path, data)?;
        log::debug!("saved reference to {}", self.path.display());
        Ok(())
    }
}

/// In-process store that forgets everything on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<i64>,
}

impl MemoryStore {
    pub fn with_value(epoch_ms: i64) -> Self {
        Self {
            value: Some(epoch_ms),
        }
    }
}

impl ReferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, epoch_ms: i64) -> Result<(), StoreError> {
        self.value = Some(epoch_ms);
        Ok(())
    }
}
