//! Persistence layer for Stationery Desk.
//!
//! This crate contains:
//! - Key/value snapshot backends (memory, JSON files)
//! - The typed `Storage` handle and its change broadcast
//! - Repository implementations, one per snapshot key
//! - Default seed data

pub mod db;
pub mod error;
pub mod events;
pub mod metrics;
pub mod repositories;
pub mod seed;
pub mod storage;
pub mod store;

pub use error::PersistenceError;
pub use events::{ChangeKind, StoreChange};
pub use storage::Storage;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreKey};
