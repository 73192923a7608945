//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model or overlay entry not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write collided with state another writer already persisted.
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O failure that is safe to retry.
    #[error("transient storage failure: {0}")]
    Transient(String),
}

impl StorageError {
    /// True when retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Transient(_))
    }
}
