//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory store, a fixed clock and a recording
//! email dispatcher, so tests never share state.

// Not every integration test uses every helper.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use domain::models::{NewRequest, RegisterUser, Session, Urgency};
use domain::services::{FixedClock, MockEmailDispatcher};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::seed::{ADMIN_EMAIL, ADMIN_PASSWORD, DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD};
use persistence::Storage;
use stationery_app::app::AppContext;
use stationery_app::config::Config;
use std::sync::Arc;

/// A wired application plus handles on its test doubles.
pub struct TestApp {
    pub ctx: AppContext,
    pub clock: Arc<FixedClock>,
    pub email: Arc<MockEmailDispatcher>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
}

/// Test app over a fresh in-memory store.
pub fn create_test_app() -> TestApp {
    create_test_app_with(Storage::in_memory(), &[])
}

/// Test app over `storage` with config overrides applied.
pub fn create_test_app_with(storage: Storage, overrides: &[(&str, &str)]) -> TestApp {
    let config = Config::load_for_test(overrides).expect("Failed to load test config");
    let clock = Arc::new(FixedClock::new(start_time()));
    let email = Arc::new(MockEmailDispatcher::new());
    let ctx = AppContext::new(config, storage, clock.clone(), email.clone());
    TestApp { ctx, clock, email }
}

/// Random registration input.
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn new() -> Self {
        Self {
            name: Name().fake(),
            email: SafeEmail().fake(),
            password: "SecureP@ss123!".to_string(),
        }
    }

    pub fn registration(&self) -> RegisterUser {
        RegisterUser {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            department: Some("Finance".to_string()),
            phone: None,
        }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn login_admin(app: &TestApp) -> Session {
    app.ctx
        .auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD, domain::models::Role::Admin)
        .await
        .expect("admin login failed")
}

pub async fn login_default_user(app: &TestApp) -> Session {
    app.ctx
        .auth
        .login(DEFAULT_USER_EMAIL, DEFAULT_USER_PASSWORD, domain::models::Role::User)
        .await
        .expect("user login failed")
}

pub fn new_request(item: &str, category: &str, quantity: u32) -> NewRequest {
    NewRequest {
        item_name: item.to_string(),
        category: category.to_string(),
        quantity,
        urgency: Urgency::Medium,
        description: String::new(),
    }
}
