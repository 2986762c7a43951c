//! Inventory repository over the `inventory` snapshot.

use domain::models::InventoryItem;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::seed::default_inventory;
use crate::storage::Storage;
use crate::store::StoreKey;

/// Repository for inventory items.
#[derive(Clone)]
pub struct InventoryRepository {
    storage: Storage,
}

impl InventoryRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All items, seeding the default stock on first access.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, PersistenceError> {
        self.storage
            .load_or_seed(StoreKey::Inventory, || Ok(default_inventory()))
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, PersistenceError> {
        Ok(self.list().await?.into_iter().find(|i| i.id == id))
    }

    /// Items at or below their reorder threshold.
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, PersistenceError> {
        let mut items = self.list().await?;
        items.retain(InventoryItem::is_low_stock);
        Ok(items)
    }

    /// Mutates the item list in place and writes it back if it changed.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Vec<InventoryItem>) -> R,
    ) -> Result<R, PersistenceError> {
        self.storage
            .modify(StoreKey::Inventory, || Ok(default_inventory()), f)
            .await
    }
}
