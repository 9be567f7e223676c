//! Tokio broadcast bus for store change notifications.

use super::StoreKey;
use tokio::sync::broadcast;

const DEFAULT_CHANGE_BUS_CAPACITY: usize = 64;

/// Notification that one or more keys changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// Keys whose values changed.
    pub keys: Vec<StoreKey>,
}

impl StoreChange {
    /// Returns true if the change touches `key`.
    #[must_use]
    pub fn touches(&self, key: StoreKey) -> bool {
        self.keys.contains(&key)
    }
}

/// Broadcasts [`StoreChange`] events to every subscriber.
#[derive(Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeBus {
    /// Creates a bus with the given buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change (best effort). Empty changes are dropped.
    pub fn publish(&self, keys: Vec<StoreKey>) {
        if keys.is_empty() {
            return;
        }
        metrics::counter!("store_changes_published_total").increment(1);
        // No subscribers is not an error.
        let _ = self.sender.send(StoreChange { keys });
    }

    /// Subscribes to the bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_BUS_CAPACITY)
    }
}
