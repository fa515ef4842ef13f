//! Node paths for addressing within configuration trees
//!
//! Provides [`NodePath`] for hierarchical addressing of nodes: map keys
//! and list indices, root to leaf.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`NodePath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Map key
    Key(String),
    /// List position
    Index(usize),
}

/// Path within a configuration tree
///
/// A list position and a map key spelled like that position are distinct
/// segments, so `x[0]` and `x.0` never compare equal.
///
/// # Examples
/// - `[Key("email"), Key("transport"), Key("host")]` → `email.transport.host`
/// - `[Key("sites"), Index(0), Key("handle")]` → `sites[0].handle`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a map key, returning new path
    #[inline]
    #[must_use]
    pub fn key(&self, segment: impl Into<String>) -> Self {
        self.child(Segment::Key(segment.into()))
    }

    /// Append a list position, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.child(Segment::Index(position))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut new = self.clone();
        new.0.push(segment);
        new
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(position) => write!(f, "[{position}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    /// Parse the dotted form produced by `Display`
    ///
    /// Keys containing `.` or `[` cannot be expressed in this form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for (i, part) in s.split('.').enumerate() {
            let (key, mut rest) = part.split_at(part.find('[').unwrap_or(part.len()));
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            } else if i > 0 || rest.is_empty() {
                return Err(PathError::EmptySegment(s.to_string()));
            }
            while !rest.is_empty() {
                let position = rest
                    .strip_prefix('[')
                    .and_then(|r| r.split_once(']'))
                    .and_then(|(digits, tail)| Some((digits.parse::<usize>().ok()?, tail)));
                let Some((position, tail)) = position else {
                    return Err(PathError::InvalidIndex(s.to_string()));
                };
                segments.push(Segment::Index(position));
                rest = tail;
            }
        }

        Ok(Self(segments))
    }
}

impl From<Vec<Segment>> for NodePath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl<'a> FromIterator<&'a str> for NodePath {
    /// Path of map keys
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(|k| Segment::Key(k.to_string())).collect())
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::root()
    }
}

/// Errors related to node paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in dotted path
    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// Bracketed list position that is not a decimal index
    #[error("path '{0}' contains an invalid list index")]
    InvalidIndex(String),
}
