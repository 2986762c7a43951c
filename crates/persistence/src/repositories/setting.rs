//! Settings repository over the `userSettings` snapshot.

use domain::models::UserSettings;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Repository for per-client settings.
#[derive(Clone)]
pub struct SettingsRepository {
    storage: Storage,
}

impl SettingsRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Stored settings, or the defaults when none were saved.
    pub async fn get(&self) -> Result<UserSettings, PersistenceError> {
        Ok(self
            .storage
            .read(StoreKey::UserSettings)
            .await?
            .unwrap_or_default())
    }

    /// Mutates the settings and writes them back if they changed.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut UserSettings) -> R,
    ) -> Result<R, PersistenceError> {
        self.storage
            .modify(StoreKey::UserSettings, || Ok(UserSettings::default()), f)
            .await
    }
}
