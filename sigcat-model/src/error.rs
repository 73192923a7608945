//! Error types for the catalog model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or parsing catalog models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed JSON, or a node that failed shape validation while parsing.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A node violates the branch/leaf shape rules.
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// A child, root or overlay key that does not survive the dotted round trip.
    #[error("invalid name: {0}")]
    InvalidName(#[from] sigcat_types::Error),

    /// The catalog document has no root entry.
    #[error("catalog has no root node")]
    MissingRoot,

    /// The catalog document has more than one top-level entry.
    #[error("catalog must have exactly one root, found {0}")]
    MultipleRoots(usize),

    /// The catalog root name differs from the model's declared `main_api`.
    #[error("catalog root {found:?} does not match main_api {expected:?}")]
    RootMismatch { expected: String, found: String },

    /// The catalog root is a leaf.
    #[error("catalog root {0:?} is not a branch")]
    RootNotBranch(String),
}
