//! Inventory service.

use domain::models::InventoryItem;
use persistence::repositories::{InventoryRepository, SessionRepository};
use persistence::{PersistenceError, Storage};
use thiserror::Error;
use uuid::Uuid;

use super::{check_session, SessionCheck};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Clone)]
pub struct InventoryService {
    inventory: InventoryRepository,
    sessions: SessionRepository,
}

impl InventoryService {
    pub fn new(storage: Storage) -> Self {
        Self {
            inventory: InventoryRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage),
        }
    }

    /// All items; the default stock is seeded on first access.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        Ok(self.inventory.list().await?)
    }

    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        Ok(self.inventory.low_stock().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<InventoryItem, InventoryError> {
        self.inventory
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::ItemNotFound(id))
    }

    /// Case-insensitive lookup by exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<InventoryItem>, InventoryError> {
        let name = name.trim();
        Ok(self
            .inventory
            .list()
            .await?
            .into_iter()
            .find(|i| i.name.eq_ignore_ascii_case(name)))
    }

    /// Inserts the item, or replaces the item with the same id.
    pub async fn upsert_item(&self, item: InventoryItem) -> Result<InventoryItem, InventoryError> {
        self.require_admin().await?;
        if item.name.trim().is_empty() {
            return Err(InventoryError::Validation("Item name must not be blank".to_string()));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(InventoryError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }

        let saved = item.clone();
        let replaced = self
            .inventory
            .update(move |items| match items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    *existing = item;
                    true
                }
                None => {
                    items.push(item);
                    false
                }
            })
            .await?;

        tracing::info!(item_id = %saved.id, name = %saved.name, replaced, "Inventory item saved");
        Ok(saved)
    }

    /// Applies a signed stock change, clamping at zero.
    pub async fn adjust_stock(&self, id: Uuid, delta: i64) -> Result<InventoryItem, InventoryError> {
        self.require_admin().await?;

        let updated = self
            .inventory
            .update(|items| {
                items.iter_mut().find(|i| i.id == id).map(|item| {
                    item.adjust_stock(delta);
                    item.clone()
                })
            })
            .await?
            .ok_or(InventoryError::ItemNotFound(id))?;

        tracing::info!(
            item_id = %id,
            delta,
            stock = updated.stock,
            low = updated.is_low_stock(),
            "Stock adjusted"
        );
        Ok(updated)
    }

    async fn require_admin(&self) -> Result<(), InventoryError> {
        match check_session(&self.sessions, true).await? {
            SessionCheck::Granted(_) => Ok(()),
            SessionCheck::Missing => Err(InventoryError::NotAuthenticated),
            SessionCheck::WrongRole => Err(InventoryError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{Role, Session};
    use persistence::seed::inventory_item_id;

    async fn admin_service() -> InventoryService {
        let storage = Storage::in_memory();
        SessionRepository::new(storage.clone())
            .save(&Session {
                user_id: Uuid::new_v4(),
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                role: Role::Admin,
                department: None,
                phone: None,
                login_at: Utc::now(),
            })
            .await
            .unwrap();
        InventoryService::new(storage)
    }

    #[tokio::test]
    async fn test_adjust_requires_session() {
        let service = InventoryService::new(Storage::in_memory());
        let result = service.adjust_stock(inventory_item_id(1), -1).await;
        assert!(matches!(result, Err(InventoryError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps() {
        let service = admin_service().await;
        let stapler = service.adjust_stock(inventory_item_id(3), -100).await.unwrap();
        assert_eq!(stapler.stock, 0);
        assert!(stapler.is_low_stock());

        let missing = service.adjust_stock(Uuid::new_v4(), 1).await;
        assert!(matches!(missing, Err(InventoryError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_inserts_and_replaces() {
        let service = admin_service().await;
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: "Sticky Notes".to_string(),
            category: "Paper".to_string(),
            stock: 3,
            min_stock: 10,
            price: 2500.0,
        };
        service.upsert_item(item.clone()).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 6);

        let restocked = InventoryItem { stock: 40, ..item };
        service.upsert_item(restocked).await.unwrap();
        let items = service.list().await.unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(
            service.find_by_name("sticky notes").await.unwrap().unwrap().stock,
            40
        );
    }

    #[tokio::test]
    async fn test_upsert_rejects_negative_price() {
        let service = admin_service().await;
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: "Glue".to_string(),
            category: "Office Tools".to_string(),
            stock: 1,
            min_stock: 1,
            price: -1.0,
        };
        assert!(matches!(
            service.upsert_item(item).await,
            Err(InventoryError::Validation(_))
        ));
    }
}
