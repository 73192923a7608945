//! Persistence contract between the catalog engine and a backend.

use crate::error::StorageResult;
use async_trait::async_trait;
use sigcat_model::{ModelRecord, Node};

/// Abstract catalog storage.
///
/// Overlay writes are insert-only: saving an entry that already exists must
/// fail with [`StorageError::Conflict`](crate::StorageError::Conflict) rather
/// than overwrite it.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Loads the persisted state of one model.
    async fn load_model(&self, model_id: &str) -> StorageResult<ModelRecord>;

    /// Registers a new model with its base catalog and an initial overlay.
    async fn create_model(&self, model_id: &str, record: &ModelRecord) -> StorageResult<()>;

    /// Lists known model ids.
    async fn list_models(&self) -> StorageResult<Vec<String>>;

    /// Persists `overlay[parent_path][leaf_name] = node`.
    async fn save_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
        node: &Node,
    ) -> StorageResult<()>;

    /// Removes `overlay[parent_path][leaf_name]`.
    async fn delete_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
    ) -> StorageResult<()>;
}
