use crate::error::{ModelError, ModelResult};
use crate::node::Node;
use indexmap::IndexMap;
use sigcat_types::{validate_name, CatalogPath};

/// The standardized signal tree of one model.
///
/// Built once from its JSON document and never mutated afterwards; custom
/// signals go into the overlay instead.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseCatalog {
    root_name: String,
    root: Node,
}

impl BaseCatalog {
    /// Wraps an already-built root branch.
    pub fn new(root_name: impl Into<String>, root: Node) -> ModelResult<Self> {
        let root_name = root_name.into();
        validate_name(&root_name)?;
        if !root.is_branch() {
            return Err(ModelError::RootNotBranch(root_name));
        }
        Ok(Self { root_name, root })
    }

    /// Parses a catalog document: a JSON object with exactly one entry, the
    /// root segment name mapped to its branch node.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let mut doc: IndexMap<String, Node> = serde_json::from_str(json)?;
        match doc.len() {
            0 => Err(ModelError::MissingRoot),
            1 => {
                let (name, root) = doc.swap_remove_index(0).ok_or(ModelError::MissingRoot)?;
                Self::new(name, root)
            }
            n => Err(ModelError::MultipleRoots(n)),
        }
    }

    /// Parses a catalog document and checks its root against `main_api`.
    pub fn from_json_with_root(json: &str, main_api: &str) -> ModelResult<Self> {
        let catalog = Self::from_json(json)?;
        if catalog.root_name != main_api {
            return Err(ModelError::RootMismatch {
                expected: main_api.to_string(),
                found: catalog.root_name,
            });
        }
        Ok(catalog)
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_path(&self) -> CatalogPath {
        CatalogPath::root(self.root_name.clone())
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node
                .children()
                .map(|c| c.values().map(count).sum())
                .unwrap_or(0)
        }
        count(&self.root)
    }

    /// Serializes back to the document shape accepted by [`Self::from_json`].
    pub fn to_json(&self) -> ModelResult<String> {
        let mut doc = IndexMap::with_capacity(1);
        doc.insert(self.root_name.as_str(), &self.root);
        Ok(serde_json::to_string(&doc)?)
    }
}
