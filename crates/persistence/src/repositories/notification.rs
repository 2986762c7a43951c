//! Notification repository over the `notifications` snapshot.

use domain::models::Notification;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Repository for notifications, oldest first.
#[derive(Clone)]
pub struct NotificationRepository {
    storage: Storage,
}

impl NotificationRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, PersistenceError> {
        Ok(self
            .storage
            .read(StoreKey::Notifications)
            .await?
            .unwrap_or_default())
    }

    pub async fn append(&self, notification: Notification) -> Result<(), PersistenceError> {
        self.update(|all| all.push(notification)).await
    }

    /// Mutates the list in place and writes it back if it changed.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Vec<Notification>) -> R,
    ) -> Result<R, PersistenceError> {
        self.storage
            .modify(StoreKey::Notifications, || Ok(Vec::new()), f)
            .await
    }

    /// Drops every notification.
    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.storage
            .write(StoreKey::Notifications, &Vec::<Notification>::new())
            .await
    }
}
