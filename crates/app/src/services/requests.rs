//! Item request service.

use domain::models::{ItemRequest, NewRequest, RequestStatus};
use domain::services::Clock;
use persistence::repositories::{RequestRepository, SessionRepository};
use persistence::{PersistenceError, Storage};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::{check_session, SessionCheck};
use crate::error::validation_message;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<validator::ValidationErrors> for RequestError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RequestError::Validation(validation_message(&errors))
    }
}

#[derive(Clone)]
pub struct RequestService {
    requests: RequestRepository,
    sessions: SessionRepository,
    clock: Arc<dyn Clock>,
}

impl RequestService {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests: RequestRepository::new(storage.clone()),
            sessions: SessionRepository::new(storage),
            clock,
        }
    }

    /// Every request in submission order.
    pub async fn list(&self) -> Result<Vec<ItemRequest>, RequestError> {
        Ok(self.requests.list().await?)
    }

    pub async fn requests_for_user(&self, user_id: Uuid) -> Result<Vec<ItemRequest>, RequestError> {
        Ok(self.requests.list_for_user(user_id).await?)
    }

    /// The logged-in user's own requests.
    pub async fn my_requests(&self) -> Result<Vec<ItemRequest>, RequestError> {
        let session = match check_session(&self.sessions, false).await? {
            SessionCheck::Granted(session) => session,
            _ => return Err(RequestError::NotAuthenticated),
        };
        self.requests_for_user(session.user_id).await
    }

    /// Records a pending request on behalf of the logged-in user.
    pub async fn submit(&self, input: NewRequest) -> Result<ItemRequest, RequestError> {
        let session = match check_session(&self.sessions, false).await? {
            SessionCheck::Granted(session) => session,
            _ => return Err(RequestError::NotAuthenticated),
        };
        input.validate()?;

        let request = ItemRequest {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            user_name: session.name,
            item_name: input.item_name.trim().to_string(),
            category: input.category.trim().to_string(),
            quantity: input.quantity,
            urgency: input.urgency,
            description: input.description.trim().to_string(),
            status: RequestStatus::Pending,
            request_date: self.clock.now(),
            updated_at: None,
        };
        self.requests.append(request.clone()).await?;

        tracing::info!(
            request_id = %request.id,
            user_id = %request.user_id,
            item = %request.item_name,
            quantity = request.quantity,
            "Request submitted"
        );
        Ok(request)
    }

    /// Approves every request whose id is in `ids`. Unknown ids are
    /// ignored. Returns how many requests were updated.
    pub async fn bulk_approve(&self, ids: &[Uuid]) -> Result<usize, RequestError> {
        self.set_status(ids, RequestStatus::Approved).await
    }

    /// Rejects every request whose id is in `ids`, same rules as approval.
    pub async fn reject(&self, ids: &[Uuid]) -> Result<usize, RequestError> {
        self.set_status(ids, RequestStatus::Rejected).await
    }

    async fn set_status(&self, ids: &[Uuid], status: RequestStatus) -> Result<usize, RequestError> {
        match check_session(&self.sessions, true).await? {
            SessionCheck::Granted(_) => {}
            SessionCheck::Missing => return Err(RequestError::NotAuthenticated),
            SessionCheck::WrongRole => return Err(RequestError::Forbidden),
        }

        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        let now = self.clock.now();
        let changed = self
            .requests
            .update(|requests| {
                let mut changed = 0;
                for request in requests.iter_mut().filter(|r| wanted.contains(&r.id)) {
                    request.transition(status, now);
                    changed += 1;
                }
                changed
            })
            .await?;

        tracing::info!(
            status = %status,
            requested = wanted.len(),
            changed,
            "Request status updated"
        );
        Ok(changed)
    }
}
