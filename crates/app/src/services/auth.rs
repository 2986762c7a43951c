//! Authentication service: accounts, the current session and profile edits.

use domain::models::{ProfilePatch, RegisterUser, Role, Session, User, UserStatus};
use domain::services::{evaluate_access, AccessDecision, Clock, EmailDispatcher, EmailMessage, Page};
use persistence::repositories::{SessionRepository, UserRepository};
use persistence::{PersistenceError, Storage};
use shared::password::{hash_password, needs_rehash, verify_password, PasswordError};
use shared::validation::normalize_email;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::error::validation_message;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is inactive")]
    UserInactive,

    #[error("Email not found")]
    EmailNotFound,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(validation_message(&errors))
    }
}

/// Acknowledgement of a password reset request. No credential changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetAck {
    pub email: String,
}

/// Account and session operations.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
    email: Arc<dyn EmailDispatcher>,
    email_enabled: bool,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        storage: Storage,
        clock: Arc<dyn Clock>,
        email: Arc<dyn EmailDispatcher>,
        email_enabled: bool,
    ) -> Self {
        Self {
            users: UserRepository::new(storage.clone(), Arc::clone(&clock)),
            sessions: SessionRepository::new(storage),
            email,
            email_enabled,
            clock,
        }
    }

    /// All accounts; the default admin and user are seeded on first access.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list().await?)
    }

    /// Creates a `user`-role account.
    pub async fn register(&self, input: RegisterUser) -> Result<User, AuthError> {
        input.validate()?;

        let email = normalize_email(&input.email);
        let password_hash = hash_password(&input.password)?;
        let user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email,
            password_hash,
            role: Role::User,
            department: input.department.filter(|d| !d.trim().is_empty()),
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            status: UserStatus::Active,
            created_at: self.clock.now(),
            updated_at: None,
        };

        let created = user.clone();
        self.users
            .update(move |users| {
                if users.iter().any(|u| u.email == user.email) {
                    return Err(AuthError::DuplicateEmail);
                }
                users.push(user);
                Ok(())
            })
            .await??;

        tracing::info!(user_id = %created.id, "User registered");
        Ok(created)
    }

    /// Establishes the session when email, role and password all match.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        let user = self
            .users
            .list()
            .await?
            .into_iter()
            .find(|u| u.email == email && u.role == role)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active() {
            return Err(AuthError::UserInactive);
        }

        if needs_rehash(&user.password_hash) {
            self.rehash(user.id, password).await?;
        }

        let session = user.start_session(self.clock.now());
        self.sessions.save(&session).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(session)
    }

    async fn rehash(&self, user_id: Uuid, password: &str) -> Result<(), AuthError> {
        let fresh = hash_password(password)?;
        self.users
            .update(|users| {
                if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
                    user.password_hash = fresh;
                }
            })
            .await?;
        tracing::debug!(user_id = %user_id, "Password hash upgraded");
        Ok(())
    }

    /// Clears the session, whether or not one exists.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(session) = self.sessions.current().await? {
            tracing::info!(user_id = %session.user_id, "User logged out");
        }
        self.sessions.clear().await?;
        Ok(())
    }

    pub async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.current().await?)
    }

    /// The current session, or `NotAuthenticated`.
    pub async fn require_session(&self) -> Result<Session, AuthError> {
        self.sessions
            .current()
            .await?
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Merges `patch` into the stored user and the live session.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<Session, AuthError> {
        patch.validate()?;
        let mut session = self.require_session().await?;

        let user_id = session.user_id;
        let new_email = patch.email.as_deref().map(normalize_email);
        let now = self.clock.now();
        let user_patch = patch.clone();

        self.users
            .update(move |users| {
                if let Some(email) = &new_email {
                    if users.iter().any(|u| u.id != user_id && &u.email == email) {
                        return Err(AuthError::DuplicateEmail);
                    }
                }
                let user = users
                    .iter_mut()
                    .find(|u| u.id == user_id)
                    .ok_or(AuthError::UserNotFound)?;
                user.apply_patch(&user_patch, now);
                Ok(())
            })
            .await??;

        session.apply_patch(&patch);
        self.sessions.save(&session).await?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(session)
    }

    /// Replaces the logged-in user's password after checking the current one.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        shared::validation::validate_password(new).map_err(|e| {
            AuthError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid password".to_string()),
            )
        })?;
        let session = self.require_session().await?;
        let fresh = hash_password(new)?;

        let user_id = session.user_id;
        let now = self.clock.now();
        let current = current.to_string();
        self.users
            .update(move |users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == user_id)
                    .ok_or(AuthError::UserNotFound)?;
                if !verify_password(&current, &user.password_hash)? {
                    return Err(AuthError::InvalidCredentials);
                }
                user.password_hash = fresh;
                user.updated_at = Some(now);
                Ok(())
            })
            .await??;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Acknowledges a reset request for a known email. Sends a notice when
    /// email is enabled; no token or credential change is involved.
    pub async fn reset_password(&self, email: &str) -> Result<PasswordResetAck, AuthError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        tracing::info!(user_id = %user.id, "Password reset requested");

        if self.email_enabled {
            let result = self
                .email
                .dispatch(EmailMessage {
                    to: user.email.clone(),
                    subject: "Password reset request".to_string(),
                    body: format!(
                        "Hello {},\n\nWe received a request to reset your password. \
                         Please contact your administrator to complete the reset.",
                        user.name
                    ),
                })
                .await;
            tracing::debug!(user_id = %user.id, result = ?result, "Reset notice dispatched");
        }

        Ok(PasswordResetAck { email: user.email })
    }

    /// Evaluates the page policy against the stored session.
    pub async fn check_access(&self, page: &Page) -> Result<AccessDecision, AuthError> {
        let session = self.sessions.current().await?;
        Ok(evaluate_access(page, session.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain::services::{FixedClock, MockEmailDispatcher};
    use persistence::seed::{ADMIN_EMAIL, ADMIN_PASSWORD, DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD};

    fn service_with(email: Arc<MockEmailDispatcher>) -> AuthService {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap(),
        ));
        AuthService::new(Storage::in_memory(), clock, email, true)
    }

    fn service() -> AuthService {
        service_with(Arc::new(MockEmailDispatcher::new()))
    }

    fn registration(email: &str) -> RegisterUser {
        RegisterUser {
            name: "Jane Roe".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            department: Some("Finance".to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_seeded_accounts_can_log_in() {
        let auth = service();
        let admin = auth.login(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await.unwrap();
        assert!(admin.is_admin());

        let user = auth
            .login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, Role::User)
            .await
            .unwrap();
        assert_eq!(user.name, "John Doe");
        assert_eq!(auth.current_session().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_login_requires_matching_role() {
        let auth = service();
        let result = auth.login(ADMIN_EMAIL, ADMIN_PASSWORD, Role::User).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let auth = service();
        let result = auth.login(ADMIN_EMAIL, "admin124", Role::Admin).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let auth = service();
        let mut input = registration("jane@example.com");
        input.password = "123".to_string();
        let result = auth.register(input).await;
        assert!(matches!(result, Err(AuthError::Validation(msg)) if msg.contains("6 characters")));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let auth = service();
        let user = auth.register(registration("jane@example.com")).await.unwrap();
        auth.users
            .update(|users| {
                for u in users.iter_mut().filter(|u| u.id == user.id) {
                    u.status = UserStatus::Inactive;
                }
            })
            .await
            .unwrap();

        let result = auth.login("jane@example.com", "secret1", Role::User).await;
        assert!(matches!(result, Err(AuthError::UserInactive)));
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let auth = service();
        let result = auth.update_profile(ProfilePatch::default()).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let auth = service();
        auth.login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, Role::User)
            .await
            .unwrap();
        let patch = ProfilePatch {
            email: Some(ADMIN_EMAIL.to_string()),
            ..Default::default()
        };
        let result = auth.update_profile(patch).await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let auth = service();
        auth.sessions
            .save(&Session {
                user_id: Uuid::new_v4(),
                name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                role: Role::User,
                department: None,
                phone: None,
                login_at: Utc::now(),
            })
            .await
            .unwrap();

        let patch = ProfilePatch {
            name: Some("Still Ghost".to_string()),
            ..Default::default()
        };
        let result = auth.update_profile(patch).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service();
        auth.login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, Role::User)
            .await
            .unwrap();

        let wrong = auth.change_password("nope-nope", "newpass1").await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        auth.change_password(DEFAULT_USER_PASSWORD, "newpass1")
            .await
            .unwrap();
        auth.logout().await.unwrap();

        assert!(auth
            .login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, Role::User)
            .await
            .is_err());
        assert!(auth
            .login(DEFAULT_USER_EMAIL, "newpass1", Role::User)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_known_and_unknown() {
        let mailer = Arc::new(MockEmailDispatcher::new());
        let auth = service_with(Arc::clone(&mailer));

        let ack = auth.reset_password(DEFAULT_USER_EMAIL).await.unwrap();
        assert_eq!(ack.email, DEFAULT_USER_EMAIL);
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, DEFAULT_USER_EMAIL);

        let result = auth.reset_password("nobody@example.com").await;
        assert!(matches!(result, Err(AuthError::EmailNotFound)));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_check_access() {
        let auth = service();
        assert_eq!(
            auth.check_access(&Page::Inventory).await.unwrap(),
            AccessDecision::Redirect(Page::Login)
        );

        auth.login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, Role::User)
            .await
            .unwrap();
        assert_eq!(
            auth.check_access(&Page::Inventory).await.unwrap(),
            AccessDecision::Redirect(Page::UserDashboard)
        );
        assert_eq!(
            auth.check_access(&Page::Catalog).await.unwrap(),
            AccessDecision::Allow
        );
    }
}
