//! Repository implementations, one per snapshot key.

pub mod inventory;
pub mod notification;
pub mod request;
pub mod session;
pub mod setting;
pub mod user;

pub use inventory::InventoryRepository;
pub use notification::NotificationRepository;
pub use request::RequestRepository;
pub use session::SessionRepository;
pub use setting::SettingsRepository;
pub use user::UserRepository;
