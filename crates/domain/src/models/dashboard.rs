//! Dashboard stat card models.

use serde::{Deserialize, Serialize};

/// Admin dashboard stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Non-admin accounts.
    pub total_users: usize,
    pub pending_requests: usize,
    pub total_items: usize,
    pub low_stock: usize,
}

/// A user's own request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub rejected_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_dashboard_serialization() {
        let json = serde_json::to_string(&AdminDashboard::default()).unwrap();
        assert!(json.contains("totalUsers"));
        assert!(json.contains("lowStock"));
    }
}
