//! Persistence error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to build seed data: {0}")]
    Seed(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<shared::password::PasswordError> for PersistenceError {
    fn from(err: shared::password::PasswordError) -> Self {
        PersistenceError::Seed(err.to_string())
    }
}
