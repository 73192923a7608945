//! Dotted catalog paths.
//!
//! A path is an ordered sequence of segments whose first segment is the
//! model's root name (`main_api`). The canonical string form joins segments
//! with [`PATH_SEPARATOR`].

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between segments in the canonical string form.
pub const PATH_SEPARATOR: char = '.';

/// Checks that a name survives the dotted round trip: non-empty and free of
/// [`PATH_SEPARATOR`].
///
/// This is the rule for names read from catalog and overlay documents;
/// [`validate_segment`] is the stricter rule for names created by users.
pub fn validate_name(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidSegment {
            segment: String::new(),
            reason: "segment is empty",
        });
    }
    if segment.contains(PATH_SEPARATOR) {
        return Err(Error::InvalidSegment {
            segment: segment.to_string(),
            reason: "segment contains the path separator",
        });
    }
    Ok(())
}

/// Checks that a segment is usable as a node name in a mutation.
///
/// Segments must be non-empty ASCII identifiers: letters, digits and
/// underscores, not starting with a digit.
pub fn validate_segment(segment: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidSegment {
        segment: segment.to_string(),
        reason,
    };

    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("segment is empty"));
    };
    if first.is_ascii_digit() {
        return Err(invalid("segment starts with a digit"));
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(invalid("only ASCII letters, digits and '_' are allowed"));
    }
    Ok(())
}

/// An ordered sequence of segment names addressing one node in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogPath(Vec<String>);

impl CatalogPath {
    /// Creates a single-segment path naming a catalog root.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Splits a dotted string without validating segments.
    ///
    /// Used on the read side, where a malformed path simply fails to resolve.
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        Self(dotted.split(PATH_SEPARATOR).map(str::to_string).collect())
    }

    /// Parses a dotted string, validating every segment.
    pub fn parse(dotted: &str) -> Result<Self> {
        if dotted.is_empty() {
            return Err(Error::EmptyPath);
        }
        let path = Self::from_dotted(dotted);
        for segment in &path.0 {
            validate_segment(segment)?;
        }
        Ok(path)
    }

    /// Builds a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Self(segments))
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed path; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the path names only a root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// The first segment.
    #[must_use]
    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// The last segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// All segments but the last, or `None` for a root path.
    #[must_use]
    pub fn parent(&self) -> Option<CatalogPath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> CatalogPath {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// True when `self` equals `other` or is one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &CatalogPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Canonical dotted form.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for CatalogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

impl FromStr for CatalogPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CatalogPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_dotted())
    }
}

impl<'de> Deserialize<'de> for CatalogPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(serde::de::Error::custom(Error::EmptyPath));
        }
        Ok(Self::from_dotted(&s))
    }
}
