//! Change notifications for store subscribers.
//!
//! Every successful write or removal is broadcast once. Rendering
//! collaborators subscribe a single time and re-read the snapshot they care
//! about when its key shows up.

use tokio::sync::broadcast;

use crate::store::StoreKey;

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Written,
    Removed,
}

/// A completed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub key: StoreKey,
    pub kind: ChangeKind,
}

/// Fan-out of [`StoreChange`] events.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<StoreChange>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Registers a listener. Slow listeners observe `Lagged` and should
    /// re-read everything.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.tx.subscribe()
    }

    /// Emits a change. Having no listeners is not an error.
    pub fn publish(&self, change: StoreChange) {
        let receivers = self.tx.send(change).unwrap_or(0);
        tracing::trace!(key = %change.key, kind = ?change.kind, receivers, "Store change published");
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}
