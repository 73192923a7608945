//! Catalog resolution and overlay-merge engine for sigcat.
//!
//! A vehicle model owns an immutable base catalog (the standardized signal
//! tree) and a mutable overlay of tenant-authored custom signals. This crate
//! answers questions about the merged namespace without ever copying one into
//! the other.
//!
//! # Components
//!
//! - **Resolver**: point lookup of a dotted path, overlay before base
//! - **Flatten**: lazy depth-first walk of base ∪ overlay, plus the separate
//!   flat listing of overlay entries
//! - **Mutator**: validated create/delete against the overlay, persisted
//!   through a [`sigcat_storage::CatalogStore`] before it becomes visible
//! - **Query**: child listing, search, in-use filtering, statistics
//! - **Engine**: the façade that publishes snapshots and serializes writers
//!
//! # Example
//!
//! ```no_run
//! use sigcat_engine::{CatalogEngine, EngineConfig};
//! use sigcat_model::Node;
//! use sigcat_storage::SqliteStore;
//! use sigcat_types::DataType;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::open("catalog.db")?);
//! let engine = CatalogEngine::load(store, "model-1", EngineConfig::default()).await?;
//!
//! engine
//!     .create("Vehicle.Wishlist", Node::actuator(DataType::Boolean, "Wishlist API"))
//!     .await?;
//! let (node, is_custom) = engine.resolve("Vehicle.Wishlist")?;
//! assert!(is_custom);
//! # let _ = node;
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod error;
pub mod flatten;
pub mod mutator;
pub mod query;
pub mod resolver;

pub use config::{EngineConfig, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use engine::{CatalogEngine, CatalogEvent};
pub use error::{CatalogError, CatalogResult};
pub use flatten::{
    custom_entry_names, custom_path_exists, flatten, CatalogEntry, FlatEntry, Flatten,
    FlattenFilter, Origin,
};
pub use mutator::OverlayMutator;
pub use query::{
    custom_entries, list_apis, list_children, orphaned_entries, search, stats,
    used_by_prototype, ApiView, CatalogStats, ChildEntry,
};
pub use resolver::{resolve, resolve_path, Resolved};
