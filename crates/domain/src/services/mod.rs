//! Domain services for Stationery Desk.
//!
//! Services here are pure rules plus the seams (clock, email) that the
//! application layer injects.

pub mod access;
pub mod alerts;
pub mod clock;
pub mod email;
pub mod reporting;

pub use access::{evaluate_access, AccessDecision, Page, PageClass};
pub use alerts::{format_relative_time, low_stock_alerts, pending_requests_alert};
pub use clock::{Clock, FixedClock, SystemClock};
pub use email::{
    ConsoleEmailDispatcher, DispatchResult, EmailDispatcher, EmailMessage, MockEmailDispatcher,
};
