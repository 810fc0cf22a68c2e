//! CLI command implementations.

pub mod data;

use std::path::Path;
use std::sync::Arc;

use bistro_storefront::storage::{FileStorage, KeyValueStorage, StorageError};
use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the data directory already holds site data (use --force to overwrite)")]
    AlreadyInitialized,

    #[error("stored slice {key} is unreadable: {error}")]
    Corrupt { key: &'static str, error: String },
}

/// Open file storage rooted at `dir`.
pub fn open_storage(dir: &Path) -> Arc<dyn KeyValueStorage> {
    Arc::new(FileStorage::open(dir))
}
