//! Filesystem-based store.
//!
//! Stores the whole record as one pretty-printed JSON file, so the options
//! CLI and simulated pages on the same machine observe the same values.

use super::{ChangeBus, PatternStore, StoreChange, StoreKey, StoreRecord};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::instrument;

/// Filesystem-backed [`PatternStore`].
///
/// Writes are read-modify-write under a process-local lock.
pub struct FilesystemStore {
    /// Path of the JSON store file.
    path: PathBuf,
    write_lock: Mutex<()>,
    bus: ChangeBus,
}

impl FilesystemStore {
    /// Creates a store at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_store_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            bus: ChangeBus::default(),
        })
    }

    /// Returns the default store path.
    ///
    /// Returns `~/.config/promptrc/store.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| {
            d.home_dir()
                .join(".config")
                .join("promptrc")
                .join("store.json")
        })
    }

    /// Returns the store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full record; a missing file is an empty record.
    fn read_record(&self) -> Result<StoreRecord> {
        if !self.path.exists() {
            return Ok(StoreRecord::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::OperationFailed {
            operation: "read_store_file".to_string(),
            cause: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Ok(StoreRecord::default());
        }

        serde_json::from_str(&content).map_err(|e| Error::OperationFailed {
            operation: "parse_store_json".to_string(),
            cause: e.to_string(),
        })
    }

    /// Writes the full record.
    fn write_record(&self, record: &StoreRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record).map_err(|e| Error::OperationFailed {
            operation: "serialize_store".to_string(),
            cause: e.to_string(),
        })?;

        fs::write(&self.path, content).map_err(|e| Error::OperationFailed {
            operation: "write_store_file".to_string(),
            cause: e.to_string(),
        })
    }
}

impl PatternStore for FilesystemStore {
    fn get(&self, keys: &[StoreKey]) -> Result<StoreRecord> {
        Ok(self.read_record()?.project(keys))
    }

    #[instrument(skip(self, update), fields(path = %self.path.display(), keys = ?update.keys()))]
    fn set(&self, update: StoreRecord) -> Result<()> {
        self.update(&[], &mut |_| Ok(update.clone()))
    }

    #[instrument(skip(self, apply), fields(path = %self.path.display()))]
    fn update(
        &self,
        keys: &[StoreKey],
        apply: &mut dyn FnMut(StoreRecord) -> Result<StoreRecord>,
    ) -> Result<()> {
        let changed = {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
            let mut record = self.read_record()?;
            let update = apply(record.project(keys))?;
            let changed = record.merge(update);
            if !changed.is_empty() {
                self.write_record(&record)?;
            }
            changed
        };
        self.bus.publish(changed);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.bus.subscribe()
    }
}
