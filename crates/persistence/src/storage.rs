//! Typed access to snapshot documents.
//!
//! [`Storage`] is the single load/save boundary: it decodes a key's
//! document, lets the caller mutate it in memory, writes the whole
//! document back and announces the change. Mutations are serialized by one
//! write lock so a read-modify-write never interleaves with another.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::error::PersistenceError;
use crate::events::{ChangeKind, ChangeNotifier, StoreChange};
use crate::metrics::{record_malformed, record_write, OperationTimer};
use crate::store::{KeyValueStore, MemoryStore, StoreKey};

/// Shared handle over a backend. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    notifier: ChangeNotifier,
    write_lock: Arc<Mutex<()>>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            notifier: ChangeNotifier::default(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Ephemeral storage backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Subscribes to completed mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }

    /// Reads and decodes a document.
    ///
    /// A document that does not decode is logged and reported as absent,
    /// so callers fall back to their defaults.
    pub async fn read<T: DeserializeOwned>(
        &self,
        key: StoreKey,
    ) -> Result<Option<T>, PersistenceError> {
        let timer = OperationTimer::new("read", key.as_str());
        let raw = self.backend.get(key.as_str()).await;
        timer.record();

        let Some(raw) = raw? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    bytes = raw.len(),
                    "Malformed snapshot, treating as absent"
                );
                record_malformed(key.as_str());
                Ok(None)
            }
        }
    }

    /// Replaces a document.
    pub async fn write<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        self.write_locked(key, value).await
    }

    /// Deletes a document. Deleting an absent key still notifies.
    pub async fn remove(&self, key: StoreKey) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let timer = OperationTimer::new("remove", key.as_str());
        let result = self.backend.remove(key.as_str()).await;
        timer.record();
        result?;

        tracing::debug!(key = %key, "Snapshot removed");
        self.notifier.publish(StoreChange {
            key,
            kind: ChangeKind::Removed,
        });
        Ok(())
    }

    /// Read-modify-write under the write lock.
    ///
    /// `init` supplies the document when the key is absent (or malformed);
    /// in that case the document is always written back. Otherwise it is
    /// written only if `f` changed it.
    pub async fn modify<T, R, I, F>(&self, key: StoreKey, init: I, f: F) -> Result<R, PersistenceError>
    where
        T: Serialize + DeserializeOwned,
        I: FnOnce() -> Result<T, PersistenceError>,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;

        let (mut value, before) = match self.read::<T>(key).await? {
            Some(value) => {
                let before = serde_json::to_string(&value)?;
                (value, Some(before))
            }
            None => (init()?, None),
        };

        let output = f(&mut value);

        let changed = match before {
            Some(before) => serde_json::to_string(&value)? != before,
            None => true,
        };
        if changed {
            self.write_locked(key, &value).await?;
        }
        Ok(output)
    }

    /// Returns the document, seeding it with `init` on first access.
    pub async fn load_or_seed<T, I>(&self, key: StoreKey, init: I) -> Result<T, PersistenceError>
    where
        T: Serialize + DeserializeOwned + Clone,
        I: FnOnce() -> Result<T, PersistenceError>,
    {
        if let Some(value) = self.read(key).await? {
            return Ok(value);
        }
        self.modify(key, init, |value: &mut T| value.clone()).await
    }

    async fn write_locked<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(value)?;
        let bytes = encoded.len();

        let timer = OperationTimer::new("write", key.as_str());
        let result = self.backend.set(key.as_str(), encoded).await;
        timer.record();
        result?;

        record_write(key.as_str(), bytes);
        tracing::debug!(key = %key, bytes, "Snapshot written");
        self.notifier.publish(StoreChange {
            key,
            kind: ChangeKind::Written,
        });
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("listeners", &self.notifier.listener_count())
            .finish_non_exhaustive()
    }
}
