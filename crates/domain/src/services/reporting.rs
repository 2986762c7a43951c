//! Report aggregation over store snapshots.
//!
//! All functions are pure linear scans; callers pass the lists they just
//! read from the store.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{
    AdminDashboard, DailyCount, DateRange, InventoryItem, InventoryReport, ItemRequest,
    MonthlyStatusCount, RequestReport, RequestStatus, Role, StockDistribution, StockLevel, User,
    UserDashboard, UserReport, UserStatus,
};

/// Bucket label for records without a grouping value.
pub const UNKNOWN_GROUP: &str = "Unknown";

fn group_key(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_GROUP.to_string(),
    }
}

fn count_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> Option<&str>,
) -> BTreeMap<String, usize> {
    let mut groups = BTreeMap::new();
    for item in items {
        *groups.entry(group_key(key(item))).or_insert(0) += 1;
    }
    groups
}

/// Request counts for requests created inside `range` (inclusive).
pub fn request_report(requests: &[ItemRequest], range: DateRange) -> RequestReport {
    let in_range: Vec<&ItemRequest> = requests
        .iter()
        .filter(|r| range.contains(r.request_date))
        .collect();

    let status_count =
        |status: RequestStatus| in_range.iter().filter(|r| r.status == status).count();

    RequestReport {
        total: in_range.len(),
        approved: status_count(RequestStatus::Approved),
        pending: status_count(RequestStatus::Pending),
        rejected: status_count(RequestStatus::Rejected),
        by_category: count_by(in_range.iter().copied(), |r| Some(r.category.as_str())),
        by_urgency: count_by(in_range.iter().copied(), |r| Some(r.urgency.as_str())),
    }
}

/// Valuation and stock summary of the inventory.
pub fn inventory_report(items: &[InventoryItem]) -> InventoryReport {
    let total_value = items.iter().map(InventoryItem::stock_value).sum();
    let average_price = if items.is_empty() {
        None
    } else {
        Some(items.iter().map(|i| i.price).sum::<f64>() / items.len() as f64)
    };

    InventoryReport {
        total_items: items.len(),
        total_value,
        low_stock_items: items.iter().filter(|i| i.is_low_stock()).count(),
        by_category: count_by(items, |i| Some(i.category.as_str())),
        average_price,
    }
}

/// Summary over non-admin accounts, with request totals per requester.
pub fn user_report(users: &[User], requests: &[ItemRequest]) -> UserReport {
    let members: Vec<&User> = users.iter().filter(|u| u.role == Role::User).collect();

    let mut requests_per_user = BTreeMap::new();
    for request in requests {
        *requests_per_user.entry(request.user_id).or_insert(0) += 1;
    }

    UserReport {
        total_users: members.len(),
        active_users: members
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .count(),
        by_department: count_by(members.iter().copied(), |u| u.department.as_deref()),
        requests_per_user,
    }
}

/// Admin stat cards.
pub fn admin_dashboard(
    users: &[User],
    requests: &[ItemRequest],
    inventory: &[InventoryItem],
) -> AdminDashboard {
    AdminDashboard {
        total_users: users.iter().filter(|u| u.role == Role::User).count(),
        pending_requests: requests.iter().filter(|r| r.is_pending()).count(),
        total_items: inventory.len(),
        low_stock: inventory.iter().filter(|i| i.is_low_stock()).count(),
    }
}

/// Stat cards for one user's own requests.
pub fn user_dashboard(requests: &[ItemRequest], user_id: uuid::Uuid) -> UserDashboard {
    let mut stats = UserDashboard::default();
    for request in requests.iter().filter(|r| r.user_id == user_id) {
        stats.total_requests += 1;
        match request.status {
            RequestStatus::Pending => stats.pending_requests += 1,
            RequestStatus::Approved => stats.approved_requests += 1,
            RequestStatus::Rejected => stats.rejected_requests += 1,
        }
    }
    stats
}

/// The last `limit` requests in insertion order, newest first.
pub fn recent_requests(requests: &[ItemRequest], limit: usize) -> Vec<&ItemRequest> {
    requests.iter().rev().take(limit).collect()
}

/// Item counts per stock band.
pub fn stock_distribution(items: &[InventoryItem]) -> StockDistribution {
    let mut dist = StockDistribution::default();
    for item in items {
        match item.stock_level() {
            StockLevel::Low => dist.low += 1,
            StockLevel::Normal => dist.normal += 1,
            StockLevel::High => dist.high += 1,
        }
    }
    dist
}

/// Requests per category over the whole list.
pub fn requests_by_category(requests: &[ItemRequest]) -> BTreeMap<String, usize> {
    count_by(requests, |r| Some(r.category.as_str()))
}

/// Request counts for each of the `days` days ending at `today`, oldest first.
pub fn daily_request_counts(
    requests: &[ItemRequest],
    today: NaiveDate,
    days: u32,
) -> Vec<DailyCount> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(u64::from(offset))))
        .map(|date| DailyCount {
            date,
            count: requests
                .iter()
                .filter(|r| r.request_date.date_naive() == date)
                .count(),
        })
        .collect()
}

/// Status split for each of the `months` calendar months ending with the
/// month of `today`, oldest first.
pub fn monthly_status_trend(
    requests: &[ItemRequest],
    today: NaiveDate,
    months: u32,
) -> Vec<MonthlyStatusCount> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..months as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
            let in_month: Vec<&ItemRequest> = requests
                .iter()
                .filter(|r| r.request_date.year() == year && r.request_date.month() == month)
                .collect();
            let count = |status: RequestStatus| in_month.iter().filter(|r| r.status == status).count();
            MonthlyStatusCount {
                month: format!("{:04}-{:02}", year, month),
                approved: count(RequestStatus::Approved),
                pending: count(RequestStatus::Pending),
                rejected: count(RequestStatus::Rejected),
            }
        })
        .collect()
}
