//! In-app notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category of a notification, used for styling and filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Inventory,
    Request,
    Approval,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
            NotificationType::Inventory => "inventory",
            NotificationType::Request => "request",
            NotificationType::Approval => "approval",
            NotificationType::System => "system",
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(NotificationType::Info),
            "success" => Ok(NotificationType::Success),
            "warning" => Ok(NotificationType::Warning),
            "error" => Ok(NotificationType::Error),
            "inventory" => Ok(NotificationType::Inventory),
            "request" => Ok(NotificationType::Request),
            "approval" => Ok(NotificationType::Approval),
            "system" => Ok(NotificationType::System),
            _ => Err(format!("Invalid notification type: {}", s)),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    /// Identity of the condition this alert reports, e.g. `low_stock:<item id>`.
    /// At most one unread notification exists per key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_key: Option<String>,
}

impl Notification {
    /// Whether this record still suppresses a new alert for `key`.
    pub fn blocks(&self, key: &str) -> bool {
        !self.read && self.dedup_key.as_deref() == Some(key)
    }
}

/// Input for creating a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub action_url: Option<String>,
    pub dedup_key: Option<String>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: NotificationType,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            notification_type,
            action_url: None,
            dedup_key: None,
        }
    }

    pub fn with_action(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn with_dedup_key(mut self, key: impl Into<String>) -> Self {
        self.dedup_key = Some(key.into());
        self
    }

    /// Materializes the record as unread.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: self.title,
            message: self.message,
            notification_type: self.notification_type,
            action_url: self.action_url,
            timestamp: now,
            read: false,
            dedup_key: self.dedup_key,
        }
    }
}

/// De-duplication key for a low-stock alert on one item.
pub fn low_stock_key(item_id: Uuid) -> String {
    format!("low_stock:{}", item_id)
}

/// De-duplication key for the pending-requests summary.
pub const PENDING_REQUESTS_KEY: &str = "pending_requests";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip() {
        for ty in [
            NotificationType::Info,
            NotificationType::Success,
            NotificationType::Warning,
            NotificationType::Error,
            NotificationType::Inventory,
            NotificationType::Request,
            NotificationType::Approval,
            NotificationType::System,
        ] {
            assert_eq!(NotificationType::from_str(ty.as_str()).unwrap(), ty);
        }
        assert!(NotificationType::from_str("urgent").is_err());
    }

    #[test]
    fn test_new_notification_starts_unread() {
        let n = NewNotification::new("Pending Requests", "You have 2 pending requests to review", NotificationType::Request)
            .with_action("requests.html")
            .into_notification(Utc::now());
        assert!(!n.read);
        assert_eq!(n.action_url.as_deref(), Some("requests.html"));
    }

    #[test]
    fn test_serialized_type_field() {
        let n = NewNotification::new("t", "m", NotificationType::Inventory).into_notification(Utc::now());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "inventory");
        assert!(json.get("dedupKey").is_none());
    }

    #[test]
    fn test_blocks_only_while_unread() {
        let key = low_stock_key(Uuid::nil());
        let mut n = NewNotification::new("Low Stock Alert", "m", NotificationType::Inventory)
            .with_dedup_key(key.clone())
            .into_notification(Utc::now());
        assert!(n.blocks(&key));
        assert!(!n.blocks(PENDING_REQUESTS_KEY));
        n.read = true;
        assert!(!n.blocks(&key));
    }

    #[test]
    fn test_records_without_key_parse() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000000","title":"Welcome","message":"hi","type":"info","timestamp":"2024-05-01T08:00:00Z","read":false}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(n.dedup_key.is_none());
        assert!(!n.blocks(PENDING_REQUESTS_KEY));
    }
}
