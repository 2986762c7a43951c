//! Domain models for Stationery Desk.

pub mod dashboard;
pub mod inventory;
pub mod notification;
pub mod report;
pub mod request;
pub mod setting;
pub mod user;

pub use dashboard::{AdminDashboard, UserDashboard};
pub use inventory::{InventoryItem, StockLevel};
pub use notification::{NewNotification, Notification, NotificationType};
pub use report::{
    DailyCount, DateRange, InventoryReport, MonthlyStatusCount, RequestReport, StockDistribution,
    UserReport,
};
pub use request::{ItemRequest, NewRequest, RequestStatus, Urgency};
pub use setting::UserSettings;
pub use user::{ProfilePatch, RegisterUser, Role, Session, User, UserStatus};
