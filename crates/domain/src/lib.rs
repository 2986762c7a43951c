//! Domain layer for Stationery Desk.
//!
//! This crate contains:
//! - Domain models (User, Session, ItemRequest, InventoryItem, Notification)
//! - Pure business rules (alert evaluation, reporting, page access)
//! - The email dispatch and clock seams used by the application services

pub mod models;
pub mod services;
