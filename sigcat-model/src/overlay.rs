use crate::error::{ModelError, ModelResult};
use crate::node::Node;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sigcat_types::{validate_name, CatalogPath};

/// Custom nodes layered over a base catalog.
///
/// Keyed by the dotted parent path, then by leaf segment name. Both levels
/// keep insertion order. A parent may be a base branch or another overlay
/// branch; overlay branches never carry declared children of their own, their
/// children are further entries keyed by the branch's full path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayMap(IndexMap<String, IndexMap<String, Node>>);

/// A borrowed view of one overlay entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayEntry<'a> {
    pub parent: &'a str,
    pub leaf: &'a str,
    pub node: &'a Node,
}

impl OverlayEntry<'_> {
    /// Full dotted path of the entry.
    pub fn full_path(&self) -> String {
        format!("{}.{}", self.parent, self.leaf)
    }
}

impl OverlayMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates the persisted `{parent: {leaf: node}}` document.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let mut map: Self = serde_json::from_str(json)?;
        map.validate()?;
        map.prune_empty();
        Ok(map)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    /// Checks a loaded overlay.
    ///
    /// Every parent segment and leaf name must be non-empty and free of the
    /// path separator, and no entry may be a branch with declared children:
    /// an overlay branch's children are further entries keyed by its path.
    pub fn validate(&self) -> ModelResult<()> {
        for (parent, bucket) in &self.0 {
            for segment in CatalogPath::from_dotted(parent).segments() {
                validate_name(segment)?;
            }
            for (leaf, node) in bucket {
                validate_name(leaf)?;
                if node.children().is_some_and(|c| !c.is_empty()) {
                    return Err(ModelError::InvalidNode(format!(
                        "custom branch {parent}.{leaf} declares inline children"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Drops parent buckets that hold no entries.
    pub fn prune_empty(&mut self) {
        self.0.retain(|_, bucket| !bucket.is_empty());
    }

    pub fn get(&self, parent: &str, leaf: &str) -> Option<&Node> {
        self.0.get(parent).and_then(|bucket| bucket.get(leaf))
    }

    /// Looks up an entry by its full path.
    pub fn get_path(&self, path: &CatalogPath) -> Option<&Node> {
        let parent = path.parent()?;
        self.get(&parent.to_dotted(), path.leaf())
    }

    pub fn contains(&self, parent: &str, leaf: &str) -> bool {
        self.get(parent, leaf).is_some()
    }

    /// Overlay children attached directly under `parent`, in insertion order.
    pub fn children_of<'a>(
        &'a self,
        parent: &str,
    ) -> impl Iterator<Item = (&'a str, &'a Node)> + use<'a> {
        self.0
            .get(parent)
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn has_children(&self, parent: &str) -> bool {
        self.0.get(parent).is_some_and(|bucket| !bucket.is_empty())
    }

    /// Every entry, one per `overlay[parent][leaf]`, without any tree walk.
    pub fn entries(&self) -> impl Iterator<Item = OverlayEntry<'_>> {
        self.0.iter().flat_map(|(parent, bucket)| {
            bucket.iter().map(move |(leaf, node)| OverlayEntry {
                parent: parent.as_str(),
                leaf: leaf.as_str(),
                node,
            })
        })
    }

    /// Parent paths that currently hold at least one entry.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries nested anywhere below `path` (excluding the entry at `path`).
    pub fn descendants_of<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = OverlayEntry<'a>> + 'a {
        self.entries().filter(move |e| {
            e.parent == path
                || (e.parent.len() > path.len()
                    && e.parent.starts_with(path)
                    && e.parent.as_bytes()[path.len()] == b'.')
        })
    }

    /// Inserts or replaces an entry, returning the replaced node.
    pub fn insert(&mut self, parent: impl Into<String>, leaf: impl Into<String>, node: Node) -> Option<Node> {
        self.0
            .entry(parent.into())
            .or_default()
            .insert(leaf.into(), node)
    }

    /// Removes an entry; the parent bucket goes with its last child.
    pub fn remove(&mut self, parent: &str, leaf: &str) -> Option<Node> {
        let bucket = self.0.get_mut(parent)?;
        let removed = bucket.shift_remove(leaf);
        if bucket.is_empty() {
            self.0.shift_remove(parent);
        }
        removed
    }

    /// Number of entries across all parents.
    pub fn len(&self) -> usize {
        self.0.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(IndexMap::is_empty)
    }
}
