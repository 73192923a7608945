//! Point lookup of a dotted path across overlay and base.
//!
//! The overlay is consulted first, then the base tree is walked one segment
//! at a time from the root. A root-only path always names the base root:
//! overlay entries are keyed by parent, so a root has none.

use sigcat_model::{Model, Node};
use sigcat_types::CatalogPath;

/// A node found by [`resolve`], with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub node: &'a Node,
    pub is_custom: bool,
}

/// Resolves a dotted path. `None` means not found.
pub fn resolve<'a>(model: &'a Model, full_path: &str) -> Option<Resolved<'a>> {
    resolve_path(model, &CatalogPath::from_dotted(full_path))
}

/// Resolves an already-split path.
pub fn resolve_path<'a>(model: &'a Model, path: &CatalogPath) -> Option<Resolved<'a>> {
    if path.first() != model.main_api() {
        return None;
    }

    if let Some(prefix) = path.parent() {
        if let Some(node) = model.overlay().get(&prefix.to_dotted(), path.leaf()) {
            return Some(Resolved {
                node,
                is_custom: true,
            });
        }
    }

    walk_base(model, path).map(|node| Resolved {
        node,
        is_custom: false,
    })
}

/// Walks the base tree only, ignoring the overlay.
pub fn walk_base<'a>(model: &'a Model, path: &CatalogPath) -> Option<&'a Node> {
    if path.first() != model.base().root_name() {
        return None;
    }
    path.segments()
        .iter()
        .skip(1)
        .try_fold(model.base().root(), |node, segment| node.child(segment))
}

/// True when `path` resolves to a branch, base or custom.
pub fn is_branch(model: &Model, path: &CatalogPath) -> bool {
    resolve_path(model, path).is_some_and(|r| r.node.is_branch())
}
