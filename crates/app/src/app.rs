//! Service wiring.

use domain::services::{Clock, ConsoleEmailDispatcher, EmailDispatcher, SystemClock};
use persistence::Storage;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{AuthService, InventoryService, NotificationService, ReportService, RequestService};

/// Every service over one shared storage handle.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub storage: Storage,
    pub clock: Arc<dyn Clock>,
    pub auth: AuthService,
    pub requests: RequestService,
    pub inventory: InventoryService,
    pub notifications: NotificationService,
    pub reports: ReportService,
}

impl AppContext {
    /// Builds the services from explicit collaborators.
    pub fn new(
        config: Config,
        storage: Storage,
        clock: Arc<dyn Clock>,
        email: Arc<dyn EmailDispatcher>,
    ) -> Self {
        let email_enabled = config.email.enabled;
        Self {
            auth: AuthService::new(storage.clone(), Arc::clone(&clock), Arc::clone(&email), email_enabled),
            requests: RequestService::new(storage.clone(), Arc::clone(&clock)),
            inventory: InventoryService::new(storage.clone()),
            notifications: NotificationService::new(
                storage.clone(),
                Arc::clone(&clock),
                email,
                email_enabled,
                config.notifications.recent_limit,
            ),
            reports: ReportService::new(storage.clone(), Arc::clone(&clock)),
            clock,
            storage,
            config,
        }
    }

    /// Opens the configured storage with the wall clock and console email.
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let storage = persistence::db::open_storage(&config.storage).await?;
        let email: Arc<dyn EmailDispatcher> = Arc::new(ConsoleEmailDispatcher::new(config.email.sender()));
        Ok(Self::new(config, storage, Arc::new(SystemClock), email))
    }
}
