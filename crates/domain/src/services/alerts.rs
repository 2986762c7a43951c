//! Alert rules evaluated against the current inventory and request lists.
//!
//! Each rule is keyed: an alert is raised only when no *unread*
//! notification carries the same de-duplication key. Reading the alert
//! re-arms the rule, so a condition that persists produces a fresh alert on
//! the next evaluation after the previous one was read.

use chrono::{DateTime, Utc};

use crate::models::notification::{low_stock_key, PENDING_REQUESTS_KEY};
use crate::models::{InventoryItem, ItemRequest, NewNotification, Notification, NotificationType};

pub const LOW_STOCK_TITLE: &str = "Low Stock Alert";
pub const PENDING_REQUESTS_TITLE: &str = "Pending Requests";
pub const PENDING_REQUESTS_ACTION: &str = "requests.html";

fn is_blocked(existing: &[Notification], key: &str) -> bool {
    existing.iter().any(|n| n.blocks(key))
}

/// Alerts for every low item that has no unread alert yet.
pub fn low_stock_alerts(
    inventory: &[InventoryItem],
    existing: &[Notification],
) -> Vec<NewNotification> {
    inventory
        .iter()
        .filter(|item| item.is_low_stock())
        .filter_map(|item| {
            let key = low_stock_key(item.id);
            if is_blocked(existing, &key) {
                return None;
            }
            Some(
                NewNotification::new(
                    LOW_STOCK_TITLE,
                    format!("{} is running low ({} remaining)", item.name, item.stock),
                    NotificationType::Inventory,
                )
                .with_dedup_key(key),
            )
        })
        .collect()
}

/// Summary alert when any request is pending and none is unread already.
pub fn pending_requests_alert(
    requests: &[ItemRequest],
    existing: &[Notification],
) -> Option<NewNotification> {
    let pending = requests.iter().filter(|r| r.is_pending()).count();
    if pending == 0 || is_blocked(existing, PENDING_REQUESTS_KEY) {
        return None;
    }
    Some(
        NewNotification::new(
            PENDING_REQUESTS_TITLE,
            format!("You have {} pending requests to review", pending),
            NotificationType::Request,
        )
        .with_action(PENDING_REQUESTS_ACTION)
        .with_dedup_key(PENDING_REQUESTS_KEY),
    )
}

/// Short age label for a notification list.
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed.num_seconds() < 60 {
        "Just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}
