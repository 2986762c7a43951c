//! User repository over the `users` snapshot.

use domain::models::User;
use domain::services::Clock;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::seed::default_users;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    storage: Storage,
    clock: Arc<dyn Clock>,
}

impl UserRepository {
    /// Creates a new UserRepository. The clock stamps seeded accounts.
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// All users, seeding the default pair on first access.
    pub async fn list(&self) -> Result<Vec<User>, PersistenceError> {
        let now = self.clock.now();
        self.storage
            .load_or_seed(StoreKey::Users, || default_users(now))
            .await
    }

    /// Find a user by exact (trimmed) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let email = email.trim();
        Ok(self.list().await?.into_iter().find(|u| u.email == email))
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }

    /// Mutates the user list in place and writes it back if it changed.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Vec<User>) -> R,
    ) -> Result<R, PersistenceError> {
        let now = self.clock.now();
        self.storage
            .modify(StoreKey::Users, || default_users(now), f)
            .await
    }
}
