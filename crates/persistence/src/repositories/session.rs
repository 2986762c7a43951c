//! The `currentUser` document.

use domain::models::Session;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Holds zero or one session.
#[derive(Clone)]
pub struct SessionRepository {
    storage: Storage,
}

impl SessionRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn current(&self) -> Result<Option<Session>, PersistenceError> {
        self.storage.read(StoreKey::CurrentUser).await
    }

    /// Replaces whatever session was stored.
    pub async fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        self.storage.write(StoreKey::CurrentUser, session).await
    }

    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove(StoreKey::CurrentUser).await
    }
}
