//! Integration tests for reports and dashboards.

mod common;

use chrono::{Duration, NaiveDate};
use common::{create_test_app, login_admin, login_default_user, new_request, TestUser};
use domain::models::{DateRange, Role};
use persistence::seed::DEFAULT_USER_ID;
use stationery_app::services::{Dashboard, ReportError};

#[tokio::test]
async fn test_inventory_report_over_seeded_stock() {
    let app = create_test_app();
    login_admin(&app).await;

    let report = app.ctx.reports.inventory_report().await.unwrap();
    assert_eq!(report.total_items, 5);
    assert_eq!(report.low_stock_items, 1);
    assert!((report.total_value - 1_865_000.0).abs() < 1e-6);
    assert!((report.average_price.unwrap() - 16_800.0).abs() < 1e-6);
    assert_eq!(report.by_category.get("Paper"), Some(&2));
    assert_eq!(report.by_category.get("Writing"), Some(&2));
    assert_eq!(report.by_category.get("Office Tools"), Some(&1));
}

#[tokio::test]
async fn test_request_report_counts_only_in_range() {
    let app = create_test_app();
    login_default_user(&app).await;
    app.ctx.requests.submit(new_request("A4 Paper", "Paper", 1)).await.unwrap();
    app.clock.advance(Duration::days(40));
    let late = app.ctx.requests.submit(new_request("Markers", "Writing", 3)).await.unwrap();

    login_admin(&app).await;
    app.ctx.requests.bulk_approve(&[late.id]).await.unwrap();

    let start = common::start_time().date_naive();
    let first_month = DateRange::from_days(start, start + Duration::days(7)).unwrap();
    let report = app.ctx.reports.request_report(first_month).await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(report.by_category.get("Paper"), Some(&1));
    assert_eq!(report.by_urgency.get("medium"), Some(&1));

    let everything = DateRange::from_days(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
    .unwrap();
    let report = app.ctx.reports.request_report(everything).await.unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.approved, 1);
    assert_eq!(report.pending, 1);
}

#[tokio::test]
async fn test_user_report_excludes_admins() {
    let app = create_test_app();
    let extra = TestUser::new();
    app.ctx.auth.register(extra.registration()).await.unwrap();

    login_default_user(&app).await;
    app.ctx.requests.submit(new_request("Notebooks", "Paper", 2)).await.unwrap();
    app.ctx.requests.submit(new_request("Stapler", "Office Tools", 1)).await.unwrap();

    login_admin(&app).await;
    let report = app.ctx.reports.user_report().await.unwrap();
    assert_eq!(report.total_users, 2);
    assert_eq!(report.active_users, 2);
    assert_eq!(report.by_department.get("IT"), Some(&1));
    assert_eq!(report.by_department.get("Finance"), Some(&1));
    assert_eq!(report.requests_per_user.get(&DEFAULT_USER_ID), Some(&2));
}

#[tokio::test]
async fn test_reports_require_admin() {
    let app = create_test_app();
    assert!(matches!(
        app.ctx.reports.inventory_report().await.unwrap_err(),
        ReportError::NotAuthenticated
    ));

    login_default_user(&app).await;
    assert!(matches!(
        app.ctx.reports.user_report().await.unwrap_err(),
        ReportError::Forbidden
    ));
}

#[tokio::test]
async fn test_dashboard_matches_session_role() {
    let app = create_test_app();
    login_default_user(&app).await;
    app.ctx.requests.submit(new_request("Blue Pens", "Writing", 10)).await.unwrap();

    match app.ctx.reports.dashboard().await.unwrap() {
        Dashboard::User(overview) => {
            assert_eq!(overview.stats.total_requests, 1);
            assert_eq!(overview.stats.pending_requests, 1);
            assert_eq!(overview.recent_requests.len(), 1);
        }
        Dashboard::Admin(_) => panic!("expected user dashboard"),
    }

    let session = login_admin(&app).await;
    assert_eq!(session.role, Role::Admin);
    match app.ctx.reports.dashboard().await.unwrap() {
        Dashboard::Admin(overview) => {
            assert_eq!(overview.stats.total_users, 1);
            assert_eq!(overview.stats.pending_requests, 1);
            assert_eq!(overview.stats.low_stock, 1);
            assert_eq!(overview.stock_distribution.low, 1);
            assert_eq!(overview.stock_distribution.normal, 2);
            assert_eq!(overview.stock_distribution.high, 2);
            assert_eq!(overview.daily_requests.len(), 7);
            assert_eq!(overview.daily_requests.last().unwrap().count, 1);
            assert_eq!(overview.monthly_trend.len(), 6);
            assert_eq!(overview.monthly_trend.last().unwrap().month, "2024-03");
            assert_eq!(overview.requests_by_category.get("Writing"), Some(&1));
        }
        Dashboard::User(_) => panic!("expected admin dashboard"),
    }
}
