//! Catalog model for sigcat.
//!
//! Defines the in-memory values every other subsystem works on:
//! - [`Node`]: branch/sensor/actuator/attribute as a closed tagged union
//! - [`BaseCatalog`]: the immutable standardized tree of one model
//! - [`OverlayMap`]: tenant-authored nodes keyed by parent path and leaf name
//! - [`Model`]: one versioned snapshot pairing a base catalog with an overlay
//! - [`ModelRecord`]: the persisted form a storage backend loads and returns
//!
//! Nothing here performs I/O. Mutating a [`Model`] produces a new snapshot and
//! leaves the original untouched, so readers holding an older snapshot never
//! observe a partial update.

mod catalog;
mod error;
mod model;
mod node;
mod overlay;

pub use catalog::BaseCatalog;
pub use error::{ModelError, ModelResult};
pub use model::{Model, ModelRecord};
pub use node::{Children, Leaf, LeafKind, Node, NodeBody};
pub use overlay::{OverlayEntry, OverlayMap};
