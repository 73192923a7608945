//! Catalog engine: one model's published snapshot plus its single writer.
//!
//! Reads clone the current `Arc<Model>` and run without any lock held.
//! Mutations queue on a writer lock, work on a private copy of the snapshot,
//! and publish it once the store has acknowledged the change.

use crate::config::{EngineConfig, Page};
use crate::error::{CatalogError, CatalogResult};
use crate::flatten::{self, CatalogEntry, FlattenFilter};
use crate::mutator::OverlayMutator;
use crate::query::{self, ApiView, CatalogStats};
use crate::resolver;
use serde::Serialize;
use sigcat_model::{Model, ModelRecord, Node};
use sigcat_storage::{CatalogStore, StorageError};
use sigcat_types::{CatalogPath, NodeKind};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

/// Change notifications, sent after the store acknowledged the change.
///
/// Subsystems that record catalog paths (usage lists, pins) listen for
/// `Deleted` to drop their own references.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    Created { path: CatalogPath, version: u64 },
    Deleted { path: CatalogPath, version: u64 },
}

async fn load_record(store: &dyn CatalogStore, model_id: &str) -> CatalogResult<ModelRecord> {
    store.load_model(model_id).await.map_err(|e| match e {
        StorageError::NotFound(_) => CatalogError::ModelNotFound(model_id.to_string()),
        other => other.into(),
    })
}

/// Query and mutation façade over one model.
pub struct CatalogEngine {
    store: Arc<dyn CatalogStore>,
    current: RwLock<Arc<Model>>,
    writer: Mutex<()>,
    mutator: OverlayMutator,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogEngine {
    /// Wraps an already-loaded model.
    pub fn new(model: Model, store: Arc<dyn CatalogStore>, config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let orphans = query::orphaned_entries(&model);
        if !orphans.is_empty() {
            warn!(
                "model {} has {} unreachable overlay entries: {}",
                model.id(),
                orphans.len(),
                orphans.join(", ")
            );
        }
        Self {
            mutator: OverlayMutator::new(Arc::clone(&store), config),
            store,
            current: RwLock::new(Arc::new(model)),
            writer: Mutex::new(()),
            events,
        }
    }

    /// Loads a model from the store and wraps it.
    pub async fn load(
        store: Arc<dyn CatalogStore>,
        model_id: &str,
        config: EngineConfig,
    ) -> CatalogResult<Self> {
        let record = load_record(store.as_ref(), model_id).await?;
        let model = Model::from_record(model_id, record)?;
        info!(
            "loaded model {model_id} from {} store: {} base nodes, {} overlay entries",
            store.backend_name(),
            model.base().node_count(),
            model.overlay().len()
        );
        Ok(Self::new(model, store, config))
    }

    /// Re-reads the model from the store, replacing the published snapshot.
    pub async fn reload(&self) -> CatalogResult<()> {
        let _guard = self.writer.lock().await;
        let id = self.snapshot().id().to_string();
        let record = load_record(self.store.as_ref(), &id).await?;
        let fresh = Model::from_record(id, record)?;
        self.publish(fresh);
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        self.mutator.config()
    }

    /// The current snapshot. Holding it never blocks writers.
    pub fn snapshot(&self) -> Arc<Model> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn publish(&self, model: Model) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(model);
    }

    /// Receives [`CatalogEvent`]s for changes made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: CatalogEvent) {
        // No receivers is fine.
        if self.events.send(event).is_err() {
            debug!("no catalog event subscribers");
        }
    }

    fn page(&self, page: Option<Page>) -> Page {
        page.unwrap_or_else(|| self.config().page(0, None))
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Resolves a dotted path to its node and whether it is custom.
    pub fn resolve(&self, full_path: &str) -> CatalogResult<(Node, bool)> {
        let model = self.snapshot();
        resolver::resolve(&model, full_path)
            .map(|r| (r.node.clone(), r.is_custom))
            .ok_or_else(|| CatalogError::NotFound(full_path.to_string()))
    }

    /// Direct children of the branch at `path` as `(name, node, is_custom)`.
    pub fn list_children(&self, path: &str, filter: &FlattenFilter) -> Vec<(String, Node, bool)> {
        let model = self.snapshot();
        query::list_children(&model, &CatalogPath::from_dotted(path), filter)
            .into_iter()
            .map(|c| (c.name.to_string(), c.node.clone(), c.is_custom))
            .collect()
    }

    /// One page of the merged namespace in walk order.
    pub fn flatten(&self, filter: FlattenFilter, page: Option<Page>) -> Vec<CatalogEntry> {
        let model = self.snapshot();
        self.page(page)
            .apply(flatten::flatten(&model, filter))
            .map(|e| e.to_owned_entry())
            .collect()
    }

    /// Full paths of all overlay entries, without walking the tree.
    pub fn custom_entry_names(&self) -> Vec<String> {
        flatten::custom_entry_names(&self.snapshot()).collect()
    }

    pub fn search(&self, query: &str, kind: Option<NodeKind>, page: Option<Page>) -> Vec<CatalogEntry> {
        let model = self.snapshot();
        query::search(&model, query, kind, self.page(page))
            .iter()
            .map(|e| e.to_owned_entry())
            .collect()
    }

    pub fn used_by_prototype(&self, used_paths: &HashSet<String>, page: Option<Page>) -> Vec<CatalogEntry> {
        let model = self.snapshot();
        query::used_by_prototype(&model, used_paths, self.page(page))
            .iter()
            .map(|e| e.to_owned_entry())
            .collect()
    }

    pub fn list_apis(&self, view: ApiView<'_>, page: Option<Page>) -> Vec<CatalogEntry> {
        let model = self.snapshot();
        query::list_apis(&model, view, self.page(page))
            .iter()
            .map(|e| e.to_owned_entry())
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        query::stats(&self.snapshot())
    }

    pub fn orphaned_entries(&self) -> Vec<String> {
        query::orphaned_entries(&self.snapshot())
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Creates a custom node. Concurrent calls for one model run one at a time.
    pub async fn create(&self, full_path: &str, node: Node) -> CatalogResult<Node> {
        let _guard = self.writer.lock().await;
        let mut working = Model::clone(&self.snapshot());
        let created = self.mutator.create(&mut working, full_path, node).await?;
        let version = working.version();
        self.publish(working);
        self.notify(CatalogEvent::Created {
            path: CatalogPath::from_dotted(full_path),
            version,
        });
        Ok(created)
    }

    /// Deletes a custom node, returning every path removed.
    pub async fn delete(&self, full_path: &str) -> CatalogResult<Vec<CatalogPath>> {
        let _guard = self.writer.lock().await;
        let mut working = Model::clone(&self.snapshot());
        let before = working.version();
        let result = self.mutator.delete(&mut working, full_path).await;

        // A cascade that failed midway still publishes what the store accepted.
        if working.version() != before {
            let version = working.version();
            let gone: Vec<CatalogPath> = self
                .snapshot()
                .overlay()
                .entries()
                .map(|e| CatalogPath::from_dotted(&e.full_path()))
                .filter(|p| working.overlay().get_path(p).is_none())
                .collect();
            self.publish(working);
            for path in gone {
                self.notify(CatalogEvent::Deleted { path, version });
            }
        }
        result
    }
}
