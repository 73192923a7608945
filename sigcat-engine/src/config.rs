use serde::{Deserialize, Serialize};

/// Default number of entries returned by a paged listing.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Upper bound on any single page.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Configuration for the catalog engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page size used when the caller does not ask for one.
    pub default_page_size: usize,
    /// Pages larger than this are clamped.
    pub max_page_size: usize,
    /// Reject created paths whose segments are not plain identifiers.
    pub validate_segments: bool,
    /// Refuse to delete a custom branch that still has custom children.
    /// When false, the children are deleted first, deepest first.
    pub refuse_non_empty_branch_delete: bool,
    /// Buffer of the change-notification channel.
    pub event_channel_capacity: usize,
    /// Give created nodes without a uuid a fresh one.
    pub assign_missing_uuid: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            validate_segments: true,
            refuse_non_empty_branch_delete: true,
            event_channel_capacity: 64,
            assign_missing_uuid: true,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builds the page for a caller request, clamping `limit`.
    pub fn page(&self, offset: usize, limit: Option<usize>) -> Page {
        let limit = limit
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);
        Page { offset, limit }
    }
}

/// A window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    /// Everything, unpaged.
    pub const ALL: Page = Page {
        offset: 0,
        limit: usize::MAX,
    };

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Applies the window lazily; nothing past `offset + limit` is pulled.
    pub fn apply<I: Iterator>(self, iter: I) -> std::iter::Take<std::iter::Skip<I>> {
        iter.skip(self.offset).take(self.limit)
    }
}
