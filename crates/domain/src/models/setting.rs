//! Per-client user settings.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// The `userSettings` document.
///
/// Only `emailNotifications` is interpreted; every other key is kept so
/// that writing the document back does not drop settings owned by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_email_notifications")]
    pub email_notifications: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

fn default_email_notifications() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: default_email_notifications(),
            extra: BTreeMap::new(),
        }
    }
}
