//! Model paths
//!
//! Provides [`ModelPath`], the dotted address of an element in the model graph.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Address of a model element
///
/// # Examples
/// - `["tasks"]` → `tasks`
/// - `["components", "main", "sources"]` → `components.main.sources`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelPath(Vec<String>);

impl ModelPath {
    /// Root path (no segments)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path with a single segment
    ///
    /// # Errors
    /// Returns error if the segment is not a valid path segment
    pub fn single(segment: impl Into<String>) -> Result<Self, PathError> {
        Self::root().child(segment)
    }

    /// Path segments from root to leaf
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path, `None` for root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    /// Leaf segment, `None` for root
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning the new path
    ///
    /// # Errors
    /// Returns error if the segment is empty or contains characters other
    /// than alphanumerics, `_` and `-`
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut new = self.clone();
        new.0.push(segment);
        Ok(new)
    }

    /// Whether `self` is a strict ancestor of `other`
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Whether `self` is an immediate child of `parent`
    #[inline]
    #[must_use]
    pub fn is_direct_child_of(&self, parent: &Self) -> bool {
        self.0.len() == parent.0.len() + 1 && parent.is_ancestor_of(self)
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        Err(PathError::EmptySegment)
    } else if segment.contains(|c: char| !c.is_alphanumeric() && c != '_' && c != '-') {
        Err(PathError::InvalidSegment(segment.to_string()))
    } else {
        Ok(())
    }
}

impl Display for ModelPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for ModelPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        s.split('.').try_fold(Self::root(), |path, seg| path.child(seg))
    }
}

impl Default for ModelPath {
    fn default() -> Self {
        Self::root()
    }
}

/// Errors related to model paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid path segment: {0} (must be alphanumeric, '_' or '-')")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_and_display() {
        let path: ModelPath = "components.main.sources".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "components.main.sources");
    }

    #[test]
    fn root_display() {
        assert_eq!(ModelPath::root().to_string(), "<root>");
        assert!("".parse::<ModelPath>().unwrap().is_empty());
    }

    #[test]
    fn parent_and_name() {
        let path: ModelPath = "a.b.c".parse().unwrap();
        assert_eq!(path.name(), Some("c"));
        assert_eq!(path.parent().unwrap().segments(), &["a", "b"]);
        assert!(ModelPath::root().parent().is_none());
    }

    #[test]
    fn child_validates_segment() {
        let base = ModelPath::single("tasks").unwrap();
        assert_eq!(base.child("build-all").unwrap().to_string(), "tasks.build-all");
        assert_eq!(base.child(""), Err(PathError::EmptySegment));
        assert!(matches!(base.child("a b"), Err(PathError::InvalidSegment(_))));
    }

    #[test]
    fn empty_segment_rejected_when_parsing() {
        assert_eq!("a..b".parse::<ModelPath>(), Err(PathError::EmptySegment));
    }

    #[test]
    fn ancestry() {
        let a: ModelPath = "a".parse().unwrap();
        let ab: ModelPath = "a.b".parse().unwrap();
        let abc: ModelPath = "a.b.c".parse().unwrap();

        assert!(a.is_ancestor_of(&abc));
        assert!(!abc.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
        assert!(ab.is_direct_child_of(&a));
        assert!(!abc.is_direct_child_of(&a));
    }

    proptest! {
        #[test]
        fn prop_parse_preserves_segments(segments in prop::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..6)) {
            let text = segments.join(".");
            let path: ModelPath = text.parse().unwrap();
            prop_assert_eq!(path.segments(), segments.as_slice());
            prop_assert_eq!(path.to_string(), text);
        }
    }
}
