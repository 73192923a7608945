//! Query surface over one model snapshot: child listing, search, in-use
//! filtering and summary counts.

use crate::config::Page;
use crate::flatten::{flatten, FlatEntry, FlattenFilter, Origin};
use crate::resolver::resolve_path;
use serde::Serialize;
use sigcat_model::{Model, Node};
use sigcat_types::{CatalogPath, NodeKind};
use std::collections::HashSet;

/// One direct child of a branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEntry<'a> {
    pub name: &'a str,
    pub node: &'a Node,
    pub is_custom: bool,
}

/// Direct children of the branch at `path`.
///
/// Base children come first in declaration order, then overlay children in
/// insertion order. A base child shadowed by an overlay entry of the same
/// name is listed once, as the overlay entry. Empty when `path` does not
/// resolve to a branch.
pub fn list_children<'a>(
    model: &'a Model,
    path: &CatalogPath,
    filter: &FlattenFilter,
) -> Vec<ChildEntry<'a>> {
    let Some(resolved) = resolve_path(model, path) else {
        return Vec::new();
    };
    if !resolved.node.is_branch() {
        return Vec::new();
    }

    let parent = path.to_dotted();
    let overlay = model.overlay();
    let base = if resolved.is_custom {
        None
    } else {
        resolved.node.children()
    };

    base.into_iter()
        .flat_map(|children| children.iter())
        .filter(|(name, _)| !overlay.contains(&parent, name))
        .map(|(name, node)| ChildEntry {
            name: name.as_str(),
            node,
            is_custom: false,
        })
        .chain(overlay.children_of(&parent).map(|(name, node)| ChildEntry {
            name,
            node,
            is_custom: true,
        }))
        .filter(|c| filter.matches(&path.child(c.name), c.node, c.is_custom))
        .collect()
}

/// Case-insensitive search over the merged namespace.
///
/// An entry matches when `query` is a substring of its full dotted path or of
/// its last segment, and its kind equals `kind` when one is given. An empty
/// query matches everything. Only the requested page is materialized.
pub fn search<'a>(
    model: &'a Model,
    query: &str,
    kind: Option<NodeKind>,
    page: Page,
) -> Vec<FlatEntry<'a>> {
    let needle = query.to_lowercase();
    let mut filter = FlattenFilter::all();
    if let Some(kind) = kind {
        filter = filter.with_kind(kind);
    }

    let hits = flatten(model, filter).filter(move |entry| {
        needle.is_empty()
            || entry.path.to_dotted().to_lowercase().contains(&needle)
            || entry.path.leaf().to_lowercase().contains(&needle)
    });
    page.apply(hits).collect()
}

/// Entries of the merged namespace whose full path is in `used_paths`.
///
/// Drives the "in-use vs all APIs" toggle: the prototype supplies the set of
/// paths it references and gets back the matching catalog entries.
pub fn used_by_prototype<'a>(
    model: &'a Model,
    used_paths: &HashSet<String>,
    page: Page,
) -> Vec<FlatEntry<'a>> {
    if used_paths.is_empty() {
        return Vec::new();
    }
    let hits = flatten(model, FlattenFilter::all())
        .filter(|entry| used_paths.contains(&entry.path.to_dotted()));
    page.apply(hits).collect()
}

/// Which entries a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiView<'u> {
    All,
    InUse(&'u HashSet<String>),
}

/// Pages through the merged namespace in either view.
pub fn list_apis<'a>(model: &'a Model, view: ApiView<'_>, page: Page) -> Vec<FlatEntry<'a>> {
    match view {
        ApiView::All => page.apply(flatten(model, FlattenFilter::all())).collect(),
        ApiView::InUse(used) => used_by_prototype(model, used, page),
    }
}

/// Node counts over the merged namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub branches: usize,
    pub sensors: usize,
    pub actuators: usize,
    pub attributes: usize,
    pub base: usize,
    pub custom: usize,
}

impl CatalogStats {
    pub fn total(&self) -> usize {
        self.base + self.custom
    }
}

pub fn stats(model: &Model) -> CatalogStats {
    flatten(model, FlattenFilter::all()).fold(CatalogStats::default(), |mut s, entry| {
        match entry.node.kind() {
            NodeKind::Branch => s.branches += 1,
            NodeKind::Sensor => s.sensors += 1,
            NodeKind::Actuator => s.actuators += 1,
            NodeKind::Attribute => s.attributes += 1,
        }
        if entry.is_custom {
            s.custom += 1;
        } else {
            s.base += 1;
        }
        s
    })
}

/// Overlay entries whose parent path no longer resolves to a branch.
///
/// Such entries are unreachable from [`flatten`] but still occupy their key.
pub fn orphaned_entries(model: &Model) -> Vec<String> {
    model
        .overlay()
        .entries()
        .filter(|e| !reachable_branch(model, &CatalogPath::from_dotted(e.parent)))
        .map(|e| e.full_path())
        .collect()
}

/// A custom branch is only reachable when its own parent is.
fn reachable_branch(model: &Model, path: &CatalogPath) -> bool {
    match resolve_path(model, path) {
        Some(r) if r.node.is_branch() => {
            !r.is_custom || path.parent().is_some_and(|p| reachable_branch(model, &p))
        }
        _ => false,
    }
}

/// Custom entries only, in walk order.
pub fn custom_entries(model: &Model, page: Page) -> Vec<FlatEntry<'_>> {
    page.apply(flatten(
        model,
        FlattenFilter::all().with_origin(Origin::Custom),
    ))
    .collect()
}
