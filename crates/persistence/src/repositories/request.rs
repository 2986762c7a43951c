//! Request repository over the `requests` snapshot.

use domain::models::ItemRequest;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Repository for item requests, kept in submission order.
#[derive(Clone)]
pub struct RequestRepository {
    storage: Storage,
}

impl RequestRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<ItemRequest>, PersistenceError> {
        Ok(self.storage.read(StoreKey::Requests).await?.unwrap_or_default())
    }

    /// Requests submitted by one user.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ItemRequest>, PersistenceError> {
        let mut requests = self.list().await?;
        requests.retain(|r| r.user_id == user_id);
        Ok(requests)
    }

    pub async fn append(&self, request: ItemRequest) -> Result<(), PersistenceError> {
        self.update(|requests| requests.push(request)).await
    }

    /// Mutates the request list in place and writes it back if it changed.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Vec<ItemRequest>) -> R,
    ) -> Result<R, PersistenceError> {
        self.storage.modify(StoreKey::Requests, || Ok(Vec::new()), f).await
    }
}
