//! Report and chart summary models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Inclusive time window for the request report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whole calendar days from `from` 00:00:00 through the last nanosecond of `to`, UTC.
    pub fn from_days(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        let start = from.and_hms_opt(0, 0, 0)?.and_utc();
        let end = to.and_hms_nano_opt(23, 59, 59, 999_999_999)?.and_utc();
        Some(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Request counts within a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestReport {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_urgency: BTreeMap<String, usize>,
}

/// Inventory valuation summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub total_items: usize,
    pub total_value: f64,
    pub low_stock_items: usize,
    pub by_category: BTreeMap<String, usize>,
    /// `None` for an empty inventory.
    pub average_price: Option<f64>,
}

/// User population and activity summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub total_users: usize,
    pub active_users: usize,
    pub by_department: BTreeMap<String, usize>,
    pub requests_per_user: BTreeMap<Uuid, usize>,
}

/// Item counts per stock band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDistribution {
    pub low: usize,
    pub normal: usize,
    pub high: usize,
}

/// Requests created on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Status split for requests created in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatusCount {
    /// `YYYY-MM`.
    pub month: String,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_range_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        let range = DateRange::new(start, end);
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_from_days_covers_last_day() {
        let range = DateRange::from_days(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap()));
        let late = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_500)
            .unwrap()
            .and_utc();
        assert!(range.contains(late));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_inventory_report_serializes_missing_average_as_null() {
        let json = serde_json::to_value(InventoryReport::default()).unwrap();
        assert!(json["averagePrice"].is_null());
        assert_eq!(json["totalItems"], 0);
    }
}
