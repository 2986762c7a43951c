//! User account and session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role a user logs in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Builds the session projection for a login at `now`.
    pub fn start_session(&self, now: DateTime<Utc>) -> Session {
        Session {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            department: self.department.clone(),
            phone: self.phone.clone(),
            login_at: now,
        }
    }

    /// Merges the set fields of `patch` into this record.
    pub fn apply_patch(&mut self, patch: &ProfilePatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            self.email = shared::validation::normalize_email(email);
        }
        if let Some(department) = &patch.department {
            self.department = Some(department.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        self.updated_at = Some(now);
    }
}

/// The identity currently logged in on this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "loginTime")]
    pub login_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Mirrors a profile patch onto the live session.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            self.email = shared::validation::normalize_email(email);
        }
        if let Some(department) = &patch.department {
            self.department = Some(department.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

/// Partial profile update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.department.is_none() && self.phone.is_none()
    }
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_not_blank(value)
}

fn validate_password(value: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_password(value)
}

fn validate_phone(value: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_phone(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: Name().fake(),
            email: SafeEmail().fake(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: Role::User,
            department: Some("IT".to_string()),
            phone: None,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("USER").unwrap(), Role::User);
        assert!(Role::from_str("owner").is_err());
    }

    #[test]
    fn test_user_snapshot_field_names() {
        let user = sample_user();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["role"], "user");
        assert_eq!(json["status"], "active");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_user_status_defaults_to_active() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "name": "ORRESY THE DESIGNER",
            "email": "admin@chugazystationery.com",
            "passwordHash": "x",
            "role": "admin",
            "createdAt": "2024-05-01T08:00:00Z"
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert!(user.is_active());
        assert!(user.is_admin());
        assert!(user.department.is_none());
    }

    #[test]
    fn test_start_session_projects_identity() {
        let user = sample_user();
        let now = Utc::now();
        let session = user.start_session(now);
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.email, user.email);
        assert_eq!(session.role, Role::User);
        assert_eq!(session.login_at, now);

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["id"], serde_json::json!(user.id));
        assert!(json.get("loginTime").is_some());
    }

    #[test]
    fn test_apply_patch_touches_only_set_fields() {
        let mut user = sample_user();
        let original_email = user.email.clone();
        let patch = ProfilePatch {
            name: Some("  Jane Doe ".to_string()),
            phone: Some("+255712345678".to_string()),
            ..Default::default()
        };
        user.apply_patch(&patch, Utc::now());
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, original_email);
        assert_eq!(user.department.as_deref(), Some("IT"));
        assert_eq!(user.phone.as_deref(), Some("+255712345678"));
        assert!(user.updated_at.is_some());
    }

    #[test]
    fn test_register_validation() {
        let valid = RegisterUser {
            name: "John Doe".to_string(),
            email: "john@company.com".to_string(),
            password: "user123".to_string(),
            department: Some("IT".to_string()),
            phone: Some("+1234567890".to_string()),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterUser {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterUser {
            password: "123".to_string(),
            ..valid.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_phone = RegisterUser {
            phone: Some("phone".to_string()),
            ..valid
        };
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_profile_patch_validation() {
        assert!(ProfilePatch::default().validate().is_ok());
        assert!(ProfilePatch::default().is_empty());

        let blank_name = ProfilePatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());
    }
}
