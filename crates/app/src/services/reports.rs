//! Report and dashboard service over the current snapshots.

use domain::models::{
    AdminDashboard, DailyCount, DateRange, InventoryReport, ItemRequest, MonthlyStatusCount,
    RequestReport, Session, StockDistribution, UserDashboard, UserReport,
};
use domain::services::{reporting, Clock};
use persistence::repositories::{
    InventoryRepository, RequestRepository, SessionRepository, UserRepository,
};
use persistence::{PersistenceError, Storage};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::{check_session, SessionCheck};

/// Requests shown in the "recent" table.
pub const RECENT_REQUESTS: usize = 5;
/// Days covered by the daily request chart.
pub const DAILY_WINDOW_DAYS: u32 = 7;
/// Months covered by the status trend chart.
pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub stats: AdminDashboard,
    pub recent_requests: Vec<ItemRequest>,
    pub stock_distribution: StockDistribution,
    pub daily_requests: Vec<DailyCount>,
    pub monthly_trend: Vec<MonthlyStatusCount>,
    pub requests_by_category: BTreeMap<String, usize>,
}

/// Everything the user dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub stats: UserDashboard,
    pub recent_requests: Vec<ItemRequest>,
}

/// Dashboard for whoever is logged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Admin(AdminOverview),
    User(UserOverview),
}

#[derive(Clone)]
pub struct ReportService {
    users: UserRepository,
    requests: RequestRepository,
    inventory: InventoryRepository,
    sessions: SessionRepository,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: UserRepository::new(storage.clone(), Arc::clone(&clock)),
            requests: RequestRepository::new(storage.clone()),
            inventory: InventoryRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage),
            clock,
        }
    }

    async fn require_admin(&self) -> Result<Session, ReportError> {
        match check_session(&self.sessions, true).await? {
            SessionCheck::Granted(session) => Ok(session),
            SessionCheck::Missing => Err(ReportError::NotAuthenticated),
            SessionCheck::WrongRole => Err(ReportError::Forbidden),
        }
    }

    /// Request counts for requests created within `range` (inclusive).
    pub async fn request_report(&self, range: DateRange) -> Result<RequestReport, ReportError> {
        self.require_admin().await?;
        let requests = self.requests.list().await?;
        Ok(reporting::request_report(&requests, range))
    }

    pub async fn inventory_report(&self) -> Result<InventoryReport, ReportError> {
        self.require_admin().await?;
        let items = self.inventory.list().await?;
        Ok(reporting::inventory_report(&items))
    }

    pub async fn user_report(&self) -> Result<UserReport, ReportError> {
        self.require_admin().await?;
        let users = self.users.list().await?;
        let requests = self.requests.list().await?;
        Ok(reporting::user_report(&users, &requests))
    }

    /// The dashboard matching the session's role.
    pub async fn dashboard(&self) -> Result<Dashboard, ReportError> {
        let session = match check_session(&self.sessions, false).await? {
            SessionCheck::Granted(session) => session,
            _ => return Err(ReportError::NotAuthenticated),
        };

        let requests = self.requests.list().await?;
        if session.is_admin() {
            let users = self.users.list().await?;
            let items = self.inventory.list().await?;
            let today = self.clock.now().date_naive();
            Ok(Dashboard::Admin(AdminOverview {
                stats: reporting::admin_dashboard(&users, &requests, &items),
                recent_requests: reporting::recent_requests(&requests, RECENT_REQUESTS)
                    .into_iter()
                    .cloned()
                    .collect(),
                stock_distribution: reporting::stock_distribution(&items),
                daily_requests: reporting::daily_request_counts(&requests, today, DAILY_WINDOW_DAYS),
                monthly_trend: reporting::monthly_status_trend(&requests, today, TREND_MONTHS),
                requests_by_category: reporting::requests_by_category(&requests),
            }))
        } else {
            let own: Vec<ItemRequest> = requests
                .into_iter()
                .filter(|r| r.user_id == session.user_id)
                .collect();
            Ok(Dashboard::User(UserOverview {
                stats: reporting::user_dashboard(&own, session.user_id),
                recent_requests: reporting::recent_requests(&own, RECENT_REQUESTS)
                    .into_iter()
                    .cloned()
                    .collect(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain::models::Role;
    use domain::services::FixedClock;
    use uuid::Uuid;

    fn fixture() -> (ReportService, SessionRepository) {
        let storage = Storage::in_memory();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap(),
        ));
        let sessions = SessionRepository::new(storage.clone());
        (ReportService::new(storage, clock), sessions)
    }

    async fn log_in(sessions: &SessionRepository, role: Role) {
        sessions
            .save(&Session {
                user_id: Uuid::new_v4(),
                name: "Kim".to_string(),
                email: "kim@example.com".to_string(),
                role,
                department: None,
                phone: None,
                login_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reports_require_admin() {
        let (service, sessions) = fixture();
        assert!(matches!(
            service.inventory_report().await,
            Err(ReportError::NotAuthenticated)
        ));

        log_in(&sessions, Role::User).await;
        assert!(matches!(
            service.inventory_report().await,
            Err(ReportError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_inventory_report_on_seed() {
        let (service, sessions) = fixture();
        log_in(&sessions, Role::Admin).await;
        let report = service.inventory_report().await.unwrap();
        assert_eq!(report.total_items, 5);
        assert_eq!(report.low_stock_items, 1);
        assert_eq!(report.total_value, 1_865_000.0);
    }

    #[tokio::test]
    async fn test_admin_dashboard_windows() {
        let (service, sessions) = fixture();
        log_in(&sessions, Role::Admin).await;
        match service.dashboard().await.unwrap() {
            Dashboard::Admin(overview) => {
                assert_eq!(overview.daily_requests.len(), DAILY_WINDOW_DAYS as usize);
                assert_eq!(overview.monthly_trend.len(), TREND_MONTHS as usize);
                assert_eq!(overview.monthly_trend.last().unwrap().month, "2024-08");
                assert_eq!(overview.stats.total_items, 5);
                assert_eq!(overview.stats.low_stock, 1);
            }
            other => panic!("expected admin dashboard, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_user_dashboard_is_empty_for_new_user() {
        let (service, sessions) = fixture();
        log_in(&sessions, Role::User).await;
        match service.dashboard().await.unwrap() {
            Dashboard::User(overview) => {
                assert_eq!(overview.stats, UserDashboard::default());
                assert!(overview.recent_requests.is_empty());
            }
            other => panic!("expected user dashboard, got {:?}", other),
        }
    }
}
