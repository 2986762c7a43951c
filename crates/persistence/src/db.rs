//! Storage backend selection.

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::store::{FileStore, MemoryStore};

/// Which backend holds the snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Opens the configured backend and wraps it in a [`Storage`] handle.
pub async fn open_storage(config: &StorageConfig) -> Result<Storage, PersistenceError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Storage::new(Arc::new(MemoryStore::new())))
        }
        StorageBackend::File => {
            let store = FileStore::open(&config.data_dir).await?;
            tracing::info!(data_dir = %config.data_dir.display(), "Using file storage");
            Ok(Storage::new(Arc::new(store)))
        }
    }
}
