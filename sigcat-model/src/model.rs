use crate::catalog::BaseCatalog;
use crate::error::{ModelError, ModelResult};
use crate::node::Node;
use crate::overlay::OverlayMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a storage backend hands back for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    pub main_api: String,
    pub base_catalog_json: String,
    #[serde(default)]
    pub overlay: OverlayMap,
}

/// One versioned snapshot of a vehicle model's catalog.
///
/// The base catalog is shared between every snapshot of the same model. The
/// overlay is copied on write: [`Model::with_entry`] and
/// [`Model::without_entry`] return a new snapshot with `version + 1` and
/// leave `self` as it was.
#[derive(Debug, Clone)]
pub struct Model {
    id: String,
    main_api: String,
    base: Arc<BaseCatalog>,
    overlay: Arc<OverlayMap>,
    version: u64,
}

impl Model {
    /// Pairs a base catalog with an overlay. The catalog root must equal `main_api`.
    pub fn new(
        id: impl Into<String>,
        main_api: impl Into<String>,
        base: BaseCatalog,
        overlay: OverlayMap,
    ) -> ModelResult<Self> {
        let main_api = main_api.into();
        if base.root_name() != main_api {
            return Err(ModelError::RootMismatch {
                expected: main_api,
                found: base.root_name().to_string(),
            });
        }
        Ok(Self {
            id: id.into(),
            main_api,
            base: Arc::new(base),
            overlay: Arc::new(overlay),
            version: 0,
        })
    }

    /// Builds a model from its persisted record, parsing the base catalog.
    pub fn from_record(id: impl Into<String>, record: ModelRecord) -> ModelResult<Self> {
        let base = BaseCatalog::from_json_with_root(&record.base_catalog_json, &record.main_api)?;
        let mut overlay = record.overlay;
        overlay.validate()?;
        overlay.prune_empty();
        Self::new(id, record.main_api, base, overlay)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn main_api(&self) -> &str {
        &self.main_api
    }

    pub fn base(&self) -> &BaseCatalog {
        &self.base
    }

    pub fn overlay(&self) -> &OverlayMap {
        &self.overlay
    }

    /// Monotonic snapshot counter, bumped by each overlay change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// New snapshot with `overlay[parent][leaf] = node`.
    #[must_use]
    pub fn with_entry(&self, parent: &str, leaf: &str, node: Node) -> Model {
        let mut overlay = OverlayMap::clone(&self.overlay);
        overlay.insert(parent, leaf, node);
        self.successor(overlay)
    }

    /// New snapshot without `overlay[parent][leaf]`.
    #[must_use]
    pub fn without_entry(&self, parent: &str, leaf: &str) -> Model {
        let mut overlay = OverlayMap::clone(&self.overlay);
        overlay.remove(parent, leaf);
        self.successor(overlay)
    }

    fn successor(&self, overlay: OverlayMap) -> Model {
        Model {
            id: self.id.clone(),
            main_api: self.main_api.clone(),
            base: Arc::clone(&self.base),
            overlay: Arc::new(overlay),
            version: self.version + 1,
        }
    }

    /// The persisted form of this snapshot.
    pub fn to_record(&self) -> ModelResult<ModelRecord> {
        Ok(ModelRecord {
            main_api: self.main_api.clone(),
            base_catalog_json: self.base.to_json()?,
            overlay: OverlayMap::clone(&self.overlay),
        })
    }

    /// Serializes the overlay to its persisted `{parent: {leaf: node}}` shape.
    pub fn overlay_json(&self) -> ModelResult<String> {
        Ok(self.overlay.to_json()?)
    }
}
