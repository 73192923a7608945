//! In-memory catalog store.

use crate::error::{StorageError, StorageResult};
use crate::store::CatalogStore;
use async_trait::async_trait;
use sigcat_model::{ModelRecord, Node};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Keeps model records in memory.
///
/// [`MemoryStore::fail_next_writes`] makes the next `n` overlay writes fail
/// with [`StorageError::Transient`], which is how callers exercise their
/// retry paths without a real backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    models: RwLock<BTreeMap<String, ModelRecord>>,
    pending_failures: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` overlay writes fail transiently.
    pub fn fail_next_writes(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    fn take_failure(&self) -> StorageResult<()> {
        let took = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if took {
            return Err(StorageError::Transient("injected write failure".into()));
        }
        Ok(())
    }

    /// Returns a copy of the stored record, if any.
    pub async fn snapshot(&self, model_id: &str) -> Option<ModelRecord> {
        self.models.read().await.get(model_id).cloned()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load_model(&self, model_id: &str) -> StorageResult<ModelRecord> {
        self.models
            .read()
            .await
            .get(model_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("model {model_id}")))
    }

    async fn create_model(&self, model_id: &str, record: &ModelRecord) -> StorageResult<()> {
        let mut models = self.models.write().await;
        if models.contains_key(model_id) {
            return Err(StorageError::Conflict(format!("model {model_id} already exists")));
        }
        models.insert(model_id.to_string(), record.clone());
        Ok(())
    }

    async fn list_models(&self) -> StorageResult<Vec<String>> {
        Ok(self.models.read().await.keys().cloned().collect())
    }

    async fn save_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
        node: &Node,
    ) -> StorageResult<()> {
        self.take_failure()?;
        let mut models = self.models.write().await;
        let record = models
            .get_mut(model_id)
            .ok_or_else(|| StorageError::NotFound(format!("model {model_id}")))?;
        if record.overlay.contains(parent_path, leaf_name) {
            return Err(StorageError::Conflict(format!(
                "{parent_path}.{leaf_name} already persisted"
            )));
        }
        record.overlay.insert(parent_path, leaf_name, node.clone());
        debug!("memory store saved {parent_path}.{leaf_name} for {model_id}");
        Ok(())
    }

    async fn delete_overlay_entry(
        &self,
        model_id: &str,
        parent_path: &str,
        leaf_name: &str,
    ) -> StorageResult<()> {
        self.take_failure()?;
        let mut models = self.models.write().await;
        let record = models
            .get_mut(model_id)
            .ok_or_else(|| StorageError::NotFound(format!("model {model_id}")))?;
        record
            .overlay
            .remove(parent_path, leaf_name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("{parent_path}.{leaf_name}")))
    }
}
