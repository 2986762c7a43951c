//! Background job that re-evaluates the alert rules.

use super::scheduler::{Job, JobFrequency};
use crate::services::NotificationService;

/// Runs the low-stock and pending-request rules on a fixed interval.
pub struct NotificationPollJob {
    notifications: NotificationService,
    interval_secs: u64,
}

impl NotificationPollJob {
    pub fn new(notifications: NotificationService, interval_secs: u64) -> Self {
        Self {
            notifications,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for NotificationPollJob {
    fn name(&self) -> &'static str {
        "notification_poll"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs.max(1))
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let outcome = self.notifications.poll().await.map_err(|e| e.to_string())?;
        if outcome.created() > 0 {
            tracing::info!(
                low_stock = outcome.low_stock.len(),
                pending_requests = outcome.pending_requests.is_some(),
                "New alerts raised"
            );
        }
        Ok(())
    }
}
