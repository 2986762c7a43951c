//! Outbound email seam for notification copies and password-reset notices.
//!
//! Nothing here talks to a mail server; the console dispatcher logs what
//! would have been sent.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Result of a dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Sent,
    /// Suppressed by configuration or the user's settings.
    Skipped,
    /// Delivery failed; never fatal to the caller.
    Failed(String),
}

/// Delivers emails on behalf of the notification and auth services.
#[async_trait::async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn dispatch(&self, message: EmailMessage) -> DispatchResult;
}

/// Logs each message instead of sending it.
#[derive(Debug, Clone)]
pub struct ConsoleEmailDispatcher {
    sender: String,
}

impl ConsoleEmailDispatcher {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait::async_trait]
impl EmailDispatcher for ConsoleEmailDispatcher {
    async fn dispatch(&self, message: EmailMessage) -> DispatchResult {
        tracing::info!(
            from = %self.sender,
            to = %message.to,
            subject = %message.subject,
            "Email sent"
        );
        DispatchResult::Sent
    }
}

/// Records messages in memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MockEmailDispatcher {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    simulate_failure: bool,
}

impl MockEmailDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            simulate_failure: true,
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl EmailDispatcher for MockEmailDispatcher {
    async fn dispatch(&self, message: EmailMessage) -> DispatchResult {
        if self.simulate_failure {
            tracing::warn!(to = %message.to, "Mock email dispatcher simulating failure");
            return DispatchResult::Failed("Simulated failure".to_string());
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        DispatchResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "admin@chugazystationery.com".to_string(),
            subject: "Low Stock Alert".to_string(),
            body: "Blue Pens is running low (15 remaining)".to_string(),
        }
    }

    #[tokio::test]
    async fn test_console_dispatcher_reports_sent() {
        let dispatcher = ConsoleEmailDispatcher::new("noreply@stationery.local");
        assert_eq!(dispatcher.dispatch(message()).await, DispatchResult::Sent);
    }

    #[tokio::test]
    async fn test_mock_dispatcher_records() {
        let dispatcher = MockEmailDispatcher::new();
        let clone = dispatcher.clone();
        dispatcher.dispatch(message()).await;
        assert_eq!(clone.sent(), vec![message()]);
    }

    #[tokio::test]
    async fn test_mock_dispatcher_failure() {
        let dispatcher = MockEmailDispatcher::failing();
        let result = dispatcher.dispatch(message()).await;
        assert!(matches!(result, DispatchResult::Failed(_)));
        assert!(dispatcher.sent().is_empty());
    }
}
