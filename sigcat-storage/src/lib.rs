//! Storage layer for sigcat.
//!
//! The catalog engine never talks to a database directly. It loads a model
//! through [`CatalogStore::load_model`] and emits one persistence intent per
//! overlay change, waiting for the backend's acknowledgment before it
//! publishes the change in memory.
//!
//! # Backends
//!
//! - [`MemoryStore`] keeps records in a map; used by tests and embedding hosts
//!   that persist elsewhere.
//! - [`SqliteStore`] keeps models and overlay entries in a SQLite file. A
//!   unique index on `(model_id, parent_path, leaf_name)` turns concurrent
//!   creates of the same path into a [`StorageError::Conflict`].

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::CatalogStore;
