//! Pattern store trait definition.

use super::{StoreChange, StoreKey, StoreRecord};
use crate::Result;
use tokio::sync::broadcast;

/// Trait for persisted key-value store backends.
///
/// Mirrors the extension storage API: partial reads by key, partial writes,
/// and a change subscription that fires after every successful write that
/// actually changed something.
pub trait PatternStore: Send + Sync {
    /// Reads the given keys.
    ///
    /// Keys that were never written are absent from the returned record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be accessed.
    fn get(&self, keys: &[StoreKey]) -> Result<StoreRecord>;

    /// Writes the keys present in `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected (quota, I/O).
    fn set(&self, record: StoreRecord) -> Result<()>;

    /// Reads `keys`, lets `apply` compute a partial update, and writes it,
    /// all without another writer interleaving.
    ///
    /// `apply` returning an error aborts the write.
    ///
    /// # Errors
    ///
    /// Returns an error from the read, from `apply`, or from the write.
    fn update(
        &self,
        keys: &[StoreKey],
        apply: &mut dyn FnMut(StoreRecord) -> Result<StoreRecord>,
    ) -> Result<()>;

    /// Subscribes to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}
