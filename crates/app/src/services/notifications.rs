//! Notification service: the bell list, toasts, email copies and the
//! low-stock / pending-request alert rules.

use domain::models::{Notification, NewNotification, UserSettings};
use domain::services::{
    low_stock_alerts, pending_requests_alert, Clock, DispatchResult, EmailDispatcher, EmailMessage,
};
use metrics::counter;
use persistence::repositories::{
    InventoryRepository, NotificationRepository, RequestRepository, SessionRepository,
    SettingsRepository,
};
use persistence::{PersistenceError, Storage};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{check_session, SessionCheck};

const TOAST_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// What one poll created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollOutcome {
    pub low_stock: Vec<Notification>,
    pub pending_requests: Option<Notification>,
}

impl PollOutcome {
    pub fn created(&self) -> usize {
        self.low_stock.len() + usize::from(self.pending_requests.is_some())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    inventory: InventoryRepository,
    requests: RequestRepository,
    sessions: SessionRepository,
    settings: SettingsRepository,
    email: Arc<dyn EmailDispatcher>,
    email_enabled: bool,
    recent_limit: usize,
    clock: Arc<dyn Clock>,
    toasts: broadcast::Sender<Notification>,
}

impl NotificationService {
    pub fn new(
        storage: Storage,
        clock: Arc<dyn Clock>,
        email: Arc<dyn EmailDispatcher>,
        email_enabled: bool,
        recent_limit: usize,
    ) -> Self {
        let (toasts, _) = broadcast::channel(TOAST_CAPACITY);
        Self {
            notifications: NotificationRepository::new(storage.clone()),
            inventory: InventoryRepository::new(storage.clone()),
            requests: RequestRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage.clone()),
            settings: SettingsRepository::new(storage),
            email,
            email_enabled,
            recent_limit,
            clock,
            toasts,
        }
    }

    /// Every notification created from now on, for toast rendering.
    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Notification> {
        self.toasts.subscribe()
    }

    /// Appends an unread notification, then announces it.
    pub async fn add(&self, new: NewNotification) -> Result<Notification, NotificationError> {
        let notification = new.into_notification(self.clock.now());
        self.notifications.append(notification.clone()).await?;
        self.announce(&notification).await;
        Ok(notification)
    }

    /// Toast plus email copy for a freshly stored notification.
    async fn announce(&self, notification: &Notification) {
        counter!(
            "notifications_created_total",
            "type" => notification.notification_type.as_str()
        )
        .increment(1);
        tracing::info!(
            notification_id = %notification.id,
            kind = %notification.notification_type,
            title = %notification.title,
            "Notification added"
        );

        // No toast listeners is normal outside watch mode.
        let _ = self.toasts.send(notification.clone());

        // The record is already stored; a failed read only costs the email.
        let result = self
            .send_email_copy(notification)
            .await
            .unwrap_or_else(|e| DispatchResult::Failed(e.to_string()));
        let outcome = match &result {
            DispatchResult::Sent => "sent",
            DispatchResult::Skipped => "skipped",
            DispatchResult::Failed(_) => "failed",
        };
        counter!("notification_emails_total", "result" => outcome).increment(1);
        if let DispatchResult::Failed(reason) = result {
            tracing::warn!(notification_id = %notification.id, reason = %reason, "Email copy failed");
        }
    }

    async fn send_email_copy(
        &self,
        notification: &Notification,
    ) -> Result<DispatchResult, NotificationError> {
        if !self.email_enabled || !self.settings.get().await?.email_notifications {
            return Ok(DispatchResult::Skipped);
        }
        let Some(session) = self.sessions.current().await? else {
            return Ok(DispatchResult::Skipped);
        };
        Ok(self
            .email
            .dispatch(EmailMessage {
                to: session.email,
                subject: notification.title.clone(),
                body: notification.message.clone(),
            })
            .await)
    }

    /// Marks one notification read. Unknown ids are a no-op returning false.
    pub async fn mark_read(&self, id: Uuid) -> Result<bool, NotificationError> {
        let found = self
            .notifications
            .update(|all| match all.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.read = true;
                    true
                }
                None => false,
            })
            .await?;
        tracing::debug!(notification_id = %id, found, "Notification marked read");
        Ok(found)
    }

    /// Marks everything read; returns how many were unread.
    pub async fn mark_all_read(&self) -> Result<usize, NotificationError> {
        let marked = self
            .notifications
            .update(|all| {
                let mut marked = 0;
                for n in all.iter_mut().filter(|n| !n.read) {
                    n.read = true;
                    marked += 1;
                }
                marked
            })
            .await?;
        tracing::debug!(marked, "All notifications marked read");
        Ok(marked)
    }

    pub async fn clear_all(&self) -> Result<(), NotificationError> {
        self.notifications.clear().await?;
        tracing::info!("Notifications cleared");
        Ok(())
    }

    /// Every notification, oldest first.
    pub async fn list(&self) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.notifications.list().await?)
    }

    /// Newest first, at most `limit` (the configured limit when `None`).
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<Notification>, NotificationError> {
        let limit = limit.unwrap_or(self.recent_limit);
        let mut all = self.notifications.list().await?;
        all.reverse();
        all.truncate(limit);
        Ok(all)
    }

    pub async fn unread_count(&self) -> Result<usize, NotificationError> {
        Ok(self
            .notifications
            .list()
            .await?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    /// Raises one alert per low item that has no unread alert.
    pub async fn evaluate_low_stock(&self) -> Result<Vec<Notification>, NotificationError> {
        let inventory = self.inventory.list().await?;
        let now = self.clock.now();

        // Rule check and append share one write so two evaluations cannot
        // both pass the unread check.
        let created = self
            .notifications
            .update(|all| {
                let created: Vec<Notification> = low_stock_alerts(&inventory, all.as_slice())
                    .into_iter()
                    .map(|alert| alert.into_notification(now))
                    .collect();
                all.extend(created.iter().cloned());
                created
            })
            .await?;

        for notification in &created {
            self.announce(notification).await;
        }
        Ok(created)
    }

    /// Raises the pending-requests summary for a logged-in admin.
    pub async fn evaluate_pending_requests(&self) -> Result<Option<Notification>, NotificationError> {
        if !matches!(
            check_session(&self.sessions, true).await?,
            SessionCheck::Granted(_)
        ) {
            return Ok(None);
        }

        let requests = self.requests.list().await?;
        let now = self.clock.now();
        let created = self
            .notifications
            .update(|all| {
                let created = pending_requests_alert(&requests, all.as_slice())
                    .map(|alert| alert.into_notification(now));
                if let Some(notification) = &created {
                    all.push(notification.clone());
                }
                created
            })
            .await?;

        if let Some(notification) = &created {
            self.announce(notification).await;
        }
        Ok(created)
    }

    /// Runs both rules against the current snapshots.
    pub async fn poll(&self) -> Result<PollOutcome, NotificationError> {
        let outcome = PollOutcome {
            low_stock: self.evaluate_low_stock().await?,
            pending_requests: self.evaluate_pending_requests().await?,
        };
        tracing::debug!(created = outcome.created(), "Notification poll finished");
        Ok(outcome)
    }

    pub async fn settings(&self) -> Result<UserSettings, NotificationError> {
        Ok(self.settings.get().await?)
    }

    /// Toggles email copies of notifications.
    pub async fn set_email_notifications(&self, enabled: bool) -> Result<UserSettings, NotificationError> {
        let settings = self
            .settings
            .update(|s| {
                s.email_notifications = enabled;
                s.clone()
            })
            .await?;
        tracing::info!(enabled, "Email notifications setting changed");
        Ok(settings)
    }
}
