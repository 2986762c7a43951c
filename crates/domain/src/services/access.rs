//! Page access policy.
//!
//! Evaluated once per page load against the current session. Pages fall in
//! three classes: public, admin-only and user-only. Pages outside those
//! lists only require a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Role, Session};

/// Known pages of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Index,
    Login,
    Register,
    ForgotPassword,
    NotFound,
    AdminDashboard,
    Inventory,
    UserManagement,
    Requests,
    UserDashboard,
    Catalog,
    Profile,
    /// Any other page file.
    Other(String),
}

/// Access class of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    Public,
    AdminOnly,
    UserOnly,
    Authenticated,
}

/// Outcome of evaluating a page visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(Page),
}

impl Page {
    /// Parses a page path like `/app/inventory.html`. Only the last segment
    /// is considered; an empty segment is the index page.
    pub fn from_path(path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or_default();
        match file {
            "" | "index.html" => Page::Index,
            "login.html" => Page::Login,
            "register.html" => Page::Register,
            "forgot-password.html" => Page::ForgotPassword,
            "404.html" => Page::NotFound,
            "admin-dashboard.html" => Page::AdminDashboard,
            "inventory.html" => Page::Inventory,
            "user-management.html" => Page::UserManagement,
            "requests.html" => Page::Requests,
            "user-dashboard.html" => Page::UserDashboard,
            "catalog.html" => Page::Catalog,
            "profile.html" => Page::Profile,
            other => Page::Other(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Page::Index => "index.html",
            Page::Login => "login.html",
            Page::Register => "register.html",
            Page::ForgotPassword => "forgot-password.html",
            Page::NotFound => "404.html",
            Page::AdminDashboard => "admin-dashboard.html",
            Page::Inventory => "inventory.html",
            Page::UserManagement => "user-management.html",
            Page::Requests => "requests.html",
            Page::UserDashboard => "user-dashboard.html",
            Page::Catalog => "catalog.html",
            Page::Profile => "profile.html",
            Page::Other(path) => path,
        }
    }

    pub fn class(&self) -> PageClass {
        match self {
            Page::Index | Page::Login | Page::Register | Page::ForgotPassword | Page::NotFound => {
                PageClass::Public
            }
            Page::AdminDashboard | Page::Inventory | Page::UserManagement | Page::Requests => {
                PageClass::AdminOnly
            }
            Page::UserDashboard | Page::Catalog | Page::Profile => PageClass::UserOnly,
            Page::Other(_) => PageClass::Authenticated,
        }
    }

    /// Landing page after login for `role`.
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Page::AdminDashboard,
            Role::User => Page::UserDashboard,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decides whether the visit may proceed or where to send the visitor.
pub fn evaluate_access(page: &Page, session: Option<&Session>) -> AccessDecision {
    let class = page.class();
    if class == PageClass::Public {
        return AccessDecision::Allow;
    }
    let Some(session) = session else {
        return AccessDecision::Redirect(Page::Login);
    };
    match (class, session.role) {
        (PageClass::AdminOnly, Role::User) => AccessDecision::Redirect(Page::UserDashboard),
        (PageClass::UserOnly, Role::Admin) => AccessDecision::Redirect(Page::AdminDashboard),
        _ => AccessDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@company.com".to_string(),
            role,
            department: None,
            phone: None,
            login_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Page::from_path("/site/inventory.html"), Page::Inventory);
        assert_eq!(Page::from_path("/"), Page::Index);
        assert_eq!(Page::from_path(""), Page::Index);
        assert_eq!(
            Page::from_path("reports.html"),
            Page::Other("reports.html".to_string())
        );
    }

    #[test]
    fn test_path_roundtrip() {
        for page in [
            Page::Login,
            Page::AdminDashboard,
            Page::Requests,
            Page::Catalog,
            Page::NotFound,
        ] {
            assert_eq!(Page::from_path(page.path()), page);
        }
    }

    #[test]
    fn test_public_pages_always_allowed() {
        assert_eq!(evaluate_access(&Page::Login, None), AccessDecision::Allow);
        assert_eq!(
            evaluate_access(&Page::Register, Some(&session(Role::Admin))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_anonymous_redirects_to_login() {
        for page in [Page::Inventory, Page::Profile, Page::Other("x.html".into())] {
            assert_eq!(
                evaluate_access(&page, None),
                AccessDecision::Redirect(Page::Login)
            );
        }
    }

    #[test]
    fn test_role_mismatch_redirects_home() {
        assert_eq!(
            evaluate_access(&Page::Inventory, Some(&session(Role::User))),
            AccessDecision::Redirect(Page::UserDashboard)
        );
        assert_eq!(
            evaluate_access(&Page::Catalog, Some(&session(Role::Admin))),
            AccessDecision::Redirect(Page::AdminDashboard)
        );
    }

    #[test]
    fn test_matching_role_allowed() {
        assert_eq!(
            evaluate_access(&Page::Requests, Some(&session(Role::Admin))),
            AccessDecision::Allow
        );
        assert_eq!(
            evaluate_access(&Page::Profile, Some(&session(Role::User))),
            AccessDecision::Allow
        );
        assert_eq!(
            evaluate_access(&Page::Other("help.html".into()), Some(&session(Role::User))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_home_for_role() {
        assert_eq!(Page::home_for(Role::Admin), Page::AdminDashboard);
        assert_eq!(Page::home_for(Role::User), Page::UserDashboard);
    }
}
