//! Core type definitions for sigcat.
//!
//! This crate defines the leaf types shared by every other crate in the
//! workspace:
//! - Catalog paths (dotted segment sequences rooted at the model's `main_api`)
//! - Node kinds (branch, sensor, actuator, attribute)
//! - The fixed set of leaf datatypes
//!
//! Node payloads and the catalog trees themselves live in `sigcat-model`.

mod kind;
mod path;

pub use kind::{DataType, NodeKind};
pub use path::{validate_name, validate_segment, CatalogPath, PATH_SEPARATOR};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("empty catalog path")]
    EmptyPath,

    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: &'static str },

    #[error("unknown datatype: {0}")]
    UnknownDataType(String),

    #[error("unknown node type: {0}")]
    UnknownNodeKind(String),
}
