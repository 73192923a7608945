//! Enumeration of the merged namespace.
//!
//! Two operations with different semantics live here and are not
//! interchangeable:
//!
//! - [`flatten`] walks the tree depth-first in pre-order from the base root,
//!   merging overlay children into every branch at read time. Use it for
//!   listings, search and anything that needs the full namespace.
//! - [`custom_entry_names`] lists each `overlay[parent][leaf]` entry once by
//!   its full path, without walking any tree. Use it to ask whether an exact
//!   custom path is already taken.

use serde::Serialize;
use sigcat_model::{Model, Node};
use sigcat_types::{CatalogPath, NodeKind};

/// Which side of the merge an entry must come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Any,
    Base,
    Custom,
}

impl Origin {
    fn admits(self, is_custom: bool) -> bool {
        match self {
            Origin::Any => true,
            Origin::Base => !is_custom,
            Origin::Custom => is_custom,
        }
    }
}

/// Restricts what [`flatten`] yields.
///
/// `under` prunes whole subtrees during the walk; `kinds` and `origin` only
/// decide which visited nodes are emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenFilter {
    /// Emit only these kinds. Empty means every kind.
    pub kinds: Vec<NodeKind>,
    pub origin: Origin,
    /// Emit only this node and its descendants.
    pub under: Option<CatalogPath>,
}

impl FlattenFilter {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kinds.push(kind);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn under(mut self, path: CatalogPath) -> Self {
        self.under = Some(path);
        self
    }

    /// Whether a visited node is emitted.
    pub fn matches(&self, path: &CatalogPath, node: &Node, is_custom: bool) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&node.kind()))
            && self.origin.admits(is_custom)
            && self.under.as_ref().is_none_or(|u| u.is_prefix_of(path))
    }

    /// Whether anything at or below `path` can match.
    fn may_contain(&self, path: &CatalogPath) -> bool {
        self.under
            .as_ref()
            .is_none_or(|u| u.is_prefix_of(path) || path.is_prefix_of(u))
    }
}

/// One node of the merged namespace, borrowed from a model snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    pub path: CatalogPath,
    pub node: &'a Node,
    pub is_custom: bool,
}

impl FlatEntry<'_> {
    pub fn to_owned_entry(&self) -> CatalogEntry {
        CatalogEntry {
            path: self.path.clone(),
            node: self.node.clone(),
            is_custom: self.is_custom,
        }
    }
}

/// Owned counterpart of [`FlatEntry`], returned by the engine façade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub path: CatalogPath,
    pub node: Node,
    pub is_custom: bool,
}

/// Lazy pre-order walk over base ∪ overlay.
///
/// Holds only the pending siblings of the current path. Calling [`flatten`]
/// again starts a fresh walk; there is no shared cursor.
pub struct Flatten<'a> {
    model: &'a Model,
    filter: FlattenFilter,
    stack: Vec<FlatEntry<'a>>,
}

/// Starts a walk of the merged namespace from the base root.
pub fn flatten(model: &Model, filter: FlattenFilter) -> Flatten<'_> {
    let root = FlatEntry {
        path: model.base().root_path(),
        node: model.base().root(),
        is_custom: false,
    };
    Flatten {
        model,
        filter,
        stack: vec![root],
    }
}

impl<'a> Flatten<'a> {
    fn push_children(&mut self, entry: &FlatEntry<'a>) {
        if !entry.node.is_branch() {
            return;
        }
        let model: &'a Model = self.model;
        let parent = entry.path.to_dotted();
        let overlay = model.overlay();
        let mut children = Vec::new();

        // Overlay branches own no base children; theirs come from overlay[path].
        if !entry.is_custom {
            if let Some(base) = entry.node.children() {
                children.extend(
                    base.iter()
                        .filter(|(name, _)| !overlay.contains(&parent, name))
                        .map(|(name, node)| FlatEntry {
                            path: entry.path.child(name.as_str()),
                            node,
                            is_custom: false,
                        }),
                );
            }
        }
        children.extend(overlay.children_of(&parent).map(|(name, node)| FlatEntry {
            path: entry.path.child(name),
            node,
            is_custom: true,
        }));

        self.stack.extend(children.into_iter().rev());
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = FlatEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.stack.pop()?;
            if !self.filter.may_contain(&entry.path) {
                continue;
            }
            self.push_children(&entry);
            if self
                .filter
                .matches(&entry.path, entry.node, entry.is_custom)
            {
                return Some(entry);
            }
        }
    }
}

/// Full paths of every overlay entry, one per `overlay[parent][leaf]`.
///
/// Does not walk the tree and does not check that parents still resolve.
pub fn custom_entry_names(model: &Model) -> impl Iterator<Item = String> + '_ {
    model.overlay().entries().map(|e| e.full_path())
}

/// True when `full_path` is literally one of the overlay's entries.
pub fn custom_path_exists(model: &Model, full_path: &str) -> bool {
    custom_entry_names(model).any(|p| p == full_path)
}
