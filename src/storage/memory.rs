//! In-process store backend.
//!
//! Used by tests, simulations and as the page-side mirror of the persisted
//! store. An optional byte quota reproduces sync-storage write rejections.

use super::{ChangeBus, PatternStore, StoreChange, StoreKey, StoreRecord};
use crate::{Error, Result};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::instrument;

/// In-memory [`PatternStore`].
pub struct MemoryStore {
    record: RwLock<StoreRecord>,
    bus: ChangeBus,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_record(StoreRecord::default())
    }

    /// Creates a store pre-populated with `record`.
    #[must_use]
    pub fn with_record(record: StoreRecord) -> Self {
        Self {
            record: RwLock::new(record),
            bus: ChangeBus::default(),
            quota_bytes: None,
        }
    }

    /// Limits the serialized size of the whole record.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    fn check_quota(&self, record: &StoreRecord) -> Result<()> {
        let Some(quota) = self.quota_bytes else {
            return Ok(());
        };
        let size = serde_json::to_vec(record)
            .map_err(|e| Error::OperationFailed {
                operation: "serialize_store_record".to_string(),
                cause: e.to_string(),
            })?
            .len();
        if size > quota {
            return Err(Error::StoreUnavailable(format!(
                "quota exceeded ({size} > {quota} bytes)"
            )));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternStore for MemoryStore {
    fn get(&self, keys: &[StoreKey]) -> Result<StoreRecord> {
        let record = self
            .record
            .read()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(record.project(keys))
    }

    #[instrument(skip(self, update), fields(keys = ?update.keys()))]
    fn set(&self, update: StoreRecord) -> Result<()> {
        self.update(&[], &mut |_| Ok(update.clone()))
    }

    #[instrument(skip(self, apply))]
    fn update(
        &self,
        keys: &[StoreKey],
        apply: &mut dyn FnMut(StoreRecord) -> Result<StoreRecord>,
    ) -> Result<()> {
        let changed = {
            let mut record = self
                .record
                .write()
                .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
            let update = apply(record.project(keys))?;
            let mut candidate = record.clone();
            let changed = candidate.merge(update);
            self.check_quota(&candidate)?;
            *record = candidate;
            changed
        };
        self.bus.publish(changed);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.bus.subscribe()
    }
}
