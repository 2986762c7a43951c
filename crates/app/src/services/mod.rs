//! Stateful services over the snapshot store.

pub mod auth;
pub mod inventory;
pub mod notifications;
pub mod reports;
pub mod requests;

pub use auth::{AuthError, AuthService, PasswordResetAck};
pub use inventory::{InventoryError, InventoryService};
pub use notifications::{NotificationError, NotificationService, PollOutcome};
pub use reports::{AdminOverview, Dashboard, ReportError, ReportService, UserOverview};
pub use requests::{RequestError, RequestService};

use domain::models::Session;
use persistence::repositories::SessionRepository;
use persistence::PersistenceError;

/// Result of checking the stored session against a required role.
pub(crate) enum SessionCheck {
    Granted(Session),
    Missing,
    WrongRole,
}

/// Loads the session and checks it. `admin` requires the admin role.
pub(crate) async fn check_session(
    sessions: &SessionRepository,
    admin: bool,
) -> Result<SessionCheck, PersistenceError> {
    Ok(match sessions.current().await? {
        None => SessionCheck::Missing,
        Some(session) if admin && !session.is_admin() => SessionCheck::WrongRole,
        Some(session) => SessionCheck::Granted(session),
    })
}
