//! Validated create/delete against the overlay.
//!
//! Every check runs here, against the snapshot being modified, so the
//! uniqueness and parent rules hold no matter which caller issued the change.
//! The working snapshot is only advanced after the store acknowledges a
//! write; a failed write leaves it exactly as it was.

use crate::config::EngineConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::resolver::{is_branch, resolve_path};
use sigcat_model::{Model, Node};
use sigcat_storage::{CatalogStore, StorageError};
use sigcat_types::{validate_name, validate_segment, CatalogPath};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies overlay changes through a [`CatalogStore`].
///
/// Callers must serialize calls per model; [`crate::CatalogEngine`] does so
/// with a single writer lock.
pub struct OverlayMutator {
    store: Arc<dyn CatalogStore>,
    config: EngineConfig,
}

impl OverlayMutator {
    pub fn new(store: Arc<dyn CatalogStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Splits a create path. The root segment is named by the base catalog,
    /// so only the segments below it are checked.
    fn parse_path(&self, full_path: &str) -> CatalogResult<CatalogPath> {
        if full_path.is_empty() {
            return Err(sigcat_types::Error::EmptyPath.into());
        }
        let path = CatalogPath::from_dotted(full_path);
        for segment in path.segments().iter().skip(1) {
            if self.config.validate_segments {
                validate_segment(segment)?;
            } else {
                validate_name(segment)?;
            }
        }
        Ok(path)
    }

    /// Checks that `node` may be created at `full_path` in `model`.
    pub fn check_create(
        &self,
        model: &Model,
        full_path: &str,
        node: &Node,
    ) -> CatalogResult<CatalogPath> {
        let path = self.parse_path(full_path)?;

        if resolve_path(model, &path).is_some() {
            return Err(CatalogError::AlreadyExists(path.to_dotted()));
        }
        let parent = path
            .parent()
            .ok_or_else(|| CatalogError::InvalidParent(path.to_dotted()))?;
        if !is_branch(model, &parent) {
            return Err(CatalogError::InvalidParent(path.to_dotted()));
        }
        if node.children().is_some_and(|c| !c.is_empty()) {
            return Err(CatalogError::InvalidNode(format!(
                "custom branch {path} cannot declare children; create them individually"
            )));
        }
        Ok(path)
    }

    /// Creates `overlay[parent][leaf] = node`, persisting before publishing.
    ///
    /// On success `model` is advanced to the new snapshot and the stored node
    /// (with any assigned uuid) is returned.
    pub async fn create(
        &self,
        model: &mut Model,
        full_path: &str,
        mut node: Node,
    ) -> CatalogResult<Node> {
        let path = match self.check_create(model, full_path, &node) {
            Ok(path) => path,
            Err(e) => {
                warn!("rejected create of {full_path}: {e}");
                return Err(e);
            }
        };
        if self.config.assign_missing_uuid && node.uuid.is_empty() {
            node.uuid = uuid::Uuid::new_v4().simple().to_string();
        }

        let parent = path
            .parent()
            .ok_or_else(|| CatalogError::InvalidParent(path.to_dotted()))?
            .to_dotted();
        let leaf = path.leaf();

        if let Err(e) = self
            .store
            .save_overlay_entry(model.id(), &parent, leaf, &node)
            .await
        {
            warn!(
                "{} store refused {path} for model {}: {e}",
                self.store.backend_name(),
                model.id()
            );
            return Err(e.into());
        }

        *model = model.with_entry(&parent, leaf, node.clone());
        info!(
            "created custom {} {path} (model {} v{})",
            node.kind(),
            model.id(),
            model.version()
        );
        Ok(node)
    }

    /// Checks that `full_path` may be deleted and returns the paths that will
    /// be removed, deepest first, ending with `full_path` itself.
    pub fn check_delete(&self, model: &Model, full_path: &str) -> CatalogResult<Vec<CatalogPath>> {
        let path = CatalogPath::from_dotted(full_path);
        let resolved = resolve_path(model, &path)
            .ok_or_else(|| CatalogError::NotFound(full_path.to_string()))?;
        if !resolved.is_custom {
            return Err(CatalogError::ReadOnlyNode(full_path.to_string()));
        }

        let dotted = path.to_dotted();
        let mut doomed: Vec<CatalogPath> = model
            .overlay()
            .descendants_of(&dotted)
            .map(|e| CatalogPath::from_dotted(&e.full_path()))
            .collect();

        if !doomed.is_empty() && self.config.refuse_non_empty_branch_delete {
            return Err(CatalogError::BranchNotEmpty(dotted));
        }
        doomed.sort_by_key(|p| std::cmp::Reverse(p.len()));
        doomed.push(path);
        Ok(doomed)
    }

    /// Deletes a custom node (and, when cascading, its custom descendants).
    ///
    /// Each removal is persisted before it is applied to `model`. If a later
    /// removal fails, the ones already acknowledged stay applied so `model`
    /// keeps matching the store. Returns the removed paths.
    pub async fn delete(&self, model: &mut Model, full_path: &str) -> CatalogResult<Vec<CatalogPath>> {
        let doomed = match self.check_delete(model, full_path) {
            Ok(doomed) => doomed,
            Err(e) => {
                warn!("rejected delete of {full_path}: {e}");
                return Err(e);
            }
        };

        let mut removed = Vec::with_capacity(doomed.len());
        for path in doomed {
            let Some(parent) = path.parent().map(|p| p.to_dotted()) else {
                continue;
            };
            match self
                .store
                .delete_overlay_entry(model.id(), &parent, path.leaf())
                .await
            {
                Ok(()) => {}
                Err(StorageError::NotFound(_)) => {
                    debug!("{path} was already absent from the store");
                }
                Err(e) => {
                    warn!("failed to delete {path} from model {}: {e}", model.id());
                    return Err(e.into());
                }
            }
            *model = model.without_entry(&parent, path.leaf());
            removed.push(path);
        }

        info!(
            "deleted {} custom node(s) at {full_path} (model {} v{})",
            removed.len(),
            model.id(),
            model.version()
        );
        Ok(removed)
    }
}
