//! Default documents written on first access.

use chrono::{DateTime, Utc};
use domain::models::{InventoryItem, Role, User, UserStatus};
use shared::password::hash_password;
use uuid::Uuid;

use crate::error::PersistenceError;

pub const ADMIN_USER_ID: Uuid = Uuid::from_u128(0x5eed_0000_0000_0000_0000_0000_0000_0001);
pub const DEFAULT_USER_ID: Uuid = Uuid::from_u128(0x5eed_0000_0000_0000_0000_0000_0000_0002);

pub const ADMIN_EMAIL: &str = "admin@chugazystationery.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_USER_EMAIL: &str = "john@company.com";
pub const DEFAULT_USER_PASSWORD: &str = "user123";

/// Stable id for the `n`th seeded inventory item.
pub const fn inventory_item_id(n: u128) -> Uuid {
    Uuid::from_u128(0x5eed_1000_0000_0000_0000_0000_0000_0000 + n)
}

/// One admin and one regular user. Passwords are hashed here.
pub fn default_users(now: DateTime<Utc>) -> Result<Vec<User>, PersistenceError> {
    tracing::info!("Seeding default users");
    Ok(vec![
        User {
            id: ADMIN_USER_ID,
            name: "ORRESY THE DESIGNER".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD)?,
            role: Role::Admin,
            department: None,
            phone: None,
            status: UserStatus::Active,
            created_at: now,
            updated_at: None,
        },
        User {
            id: DEFAULT_USER_ID,
            name: "John Doe".to_string(),
            email: DEFAULT_USER_EMAIL.to_string(),
            password_hash: hash_password(DEFAULT_USER_PASSWORD)?,
            role: Role::User,
            department: Some("IT".to_string()),
            phone: Some("+1234567890".to_string()),
            status: UserStatus::Active,
            created_at: now,
            updated_at: None,
        },
    ])
}

/// Starting inventory.
pub fn default_inventory() -> Vec<InventoryItem> {
    tracing::info!("Seeding default inventory");
    let item = |n: u128, name: &str, category: &str, stock: u32, min_stock: u32, price: f64| {
        InventoryItem {
            id: inventory_item_id(n),
            name: name.to_string(),
            category: category.to_string(),
            stock,
            min_stock,
            price,
        }
    };
    vec![
        item(1, "A4 Paper", "Paper", 50, 20, 15000.0),
        item(2, "Blue Pens", "Writing", 15, 25, 5000.0),
        item(3, "Stapler", "Office Tools", 8, 5, 32000.0),
        item(4, "Notebooks", "Paper", 30, 15, 10000.0),
        item(5, "Markers", "Writing", 22, 10, 22000.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::password::verify_password;

    #[test]
    fn test_default_users_are_hashed() {
        let users = default_users(Utc::now()).unwrap();
        assert_eq!(users.len(), 2);

        let admin = &users[0];
        assert_eq!(admin.role, Role::Admin);
        assert_ne!(admin.password_hash, ADMIN_PASSWORD);
        assert!(verify_password(ADMIN_PASSWORD, &admin.password_hash).unwrap());

        let john = &users[1];
        assert_eq!(john.role, Role::User);
        assert_eq!(john.department.as_deref(), Some("IT"));
        assert!(verify_password(DEFAULT_USER_PASSWORD, &john.password_hash).unwrap());
    }

    #[test]
    fn test_default_inventory() {
        let items = default_inventory();
        assert_eq!(items.len(), 5);

        let low: Vec<_> = items.iter().filter(|i| i.is_low_stock()).collect();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Blue Pens");
        assert_eq!(low[0].id, inventory_item_id(2));
    }
}
