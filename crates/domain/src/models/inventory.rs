//! Inventory domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stocked stationery item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub stock: u32,
    /// Reorder threshold.
    pub min_stock: u32,
    pub price: f64,
}

impl InventoryItem {
    /// Low stock means at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn stock_level(&self) -> StockLevel {
        if self.stock <= self.min_stock {
            StockLevel::Low
        } else if self.stock <= self.min_stock.saturating_mul(2) {
            StockLevel::Normal
        } else {
            StockLevel::High
        }
    }

    /// Value of the units on hand.
    pub fn stock_value(&self) -> f64 {
        f64::from(self.stock) * self.price
    }

    /// Applies a signed stock adjustment, clamping at zero.
    pub fn adjust_stock(&mut self, delta: i64) {
        let next = i64::from(self.stock).saturating_add(delta);
        self.stock = next.clamp(0, i64::from(u32::MAX)) as u32;
    }
}

/// Coarse stock band used by the dashboard distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Normal,
    High,
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLevel::Low => write!(f, "low"),
            StockLevel::Normal => write!(f, "normal"),
            StockLevel::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock: u32, min_stock: u32) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: "Blue Pens".to_string(),
            category: "Writing".to_string(),
            stock,
            min_stock,
            price: 5000.0,
        }
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(item(15, 25).is_low_stock());
        assert!(item(25, 25).is_low_stock());
        assert!(!item(26, 25).is_low_stock());
    }

    #[test]
    fn test_stock_level_bands() {
        assert_eq!(item(5, 5).stock_level(), StockLevel::Low);
        assert_eq!(item(8, 5).stock_level(), StockLevel::Normal);
        assert_eq!(item(10, 5).stock_level(), StockLevel::Normal);
        assert_eq!(item(11, 5).stock_level(), StockLevel::High);
        assert_eq!(item(0, 0).stock_level(), StockLevel::Low);
        assert_eq!(item(1, 0).stock_level(), StockLevel::High);
    }

    #[test]
    fn test_adjust_stock_clamps_at_zero() {
        let mut it = item(8, 5);
        it.adjust_stock(-3);
        assert_eq!(it.stock, 5);
        it.adjust_stock(-100);
        assert_eq!(it.stock, 0);
        it.adjust_stock(12);
        assert_eq!(it.stock, 12);
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(item(15, 25).stock_value(), 75_000.0);
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = serde_json::to_value(item(1, 2)).unwrap();
        assert_eq!(json["minStock"], 2);
    }
}
