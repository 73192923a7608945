//! Error types for catalog queries and overlay mutations.

use sigcat_model::ModelError;
use sigcat_storage::StorageError;
use thiserror::Error;

/// Result type for engine operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by the catalog engine.
///
/// `NotFound` on a read is an ordinary outcome. `AlreadyExists`,
/// `InvalidParent`, `ReadOnlyNode`, `InvalidPath`, `InvalidNode` and
/// `BranchNotEmpty` need the caller to change the request; `Conflict` and
/// `Transient` may be retried unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no node at {0}")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("parent of {0} is not an existing branch")]
    InvalidParent(String),

    #[error("{0} belongs to the base catalog and cannot be modified")]
    ReadOnlyNode(String),

    #[error("{0} has custom children; delete them first")]
    BranchNotEmpty(String),

    #[error("invalid path: {0}")]
    InvalidPath(#[from] sigcat_types::Error),

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    /// True when the same call may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Transient(_) | CatalogError::Conflict(_))
    }
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => CatalogError::Conflict(msg),
            StorageError::Transient(msg) => CatalogError::Transient(msg),
            other => CatalogError::Storage(other.to_string()),
        }
    }
}
