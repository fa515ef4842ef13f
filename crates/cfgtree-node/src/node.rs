//! Configuration tree values
//!
//! Provides [`ConfigNode`], the tagged union every transform operates on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Ordered string-keyed map of configuration nodes
///
/// Iteration order is insertion order and is significant.
pub type ConfigMap = IndexMap<String, ConfigNode>;

/// Leaf value of a configuration tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer or finite float
    Number(Number),
    /// Text
    String(String),
}

impl Scalar {
    /// Convert a float, mapping non-finite values to [`Scalar::Null`]
    #[inline]
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }

    /// Text form used when a scalar appears in key position
    #[must_use]
    pub fn key_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }
}

/// A configuration tree
///
/// Equality is order-sensitive for maps: two maps are equal only when
/// they hold the same entries in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    /// Leaf value
    Scalar(Scalar),
    /// Positional sequence
    List(Vec<ConfigNode>),
    /// Ordered mapping
    Map(ConfigMap),
}

impl ConfigNode {
    /// Null leaf
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Empty map
    #[inline]
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(ConfigMap::new())
    }

    /// Empty list
    #[inline]
    #[must_use]
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Build a map from key/value pairs, keeping their order
    #[must_use]
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ConfigNode>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from values
    #[must_use]
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<ConfigNode>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Variant name, for diagnostics
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(Scalar::Null) => "null",
            Self::Scalar(Scalar::Bool(_)) => "bool",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::Scalar(Scalar::String(_)) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// True for an empty list or an empty map
    #[inline]
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    /// True for scalars and empty containers
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_)) || self.is_empty_container()
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[ConfigNode]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Child under a map key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Follow a sequence of map keys / list indices
    #[must_use]
    pub fn get_path<'a, I>(&self, segments: I) -> Option<&ConfigNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self;
        for segment in segments {
            current = match current {
                Self::Map(map) => map.get(segment)?,
                Self::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                Self::Scalar(_) => return None,
            };
        }
        Some(current)
    }
}

impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            _ => false,
        }
    }
}

impl Default for ConfigNode {
    fn default() -> Self {
        Self::null()
    }
}

impl From<Scalar> for ConfigNode {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<i32> for ConfigNode {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<u64> for ConfigNode {
    fn from(value: u64) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<f64> for ConfigNode {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::from_f64(value))
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(items: Vec<ConfigNode>) -> Self {
        Self::List(items)
    }
}

impl From<ConfigMap> for ConfigNode {
    fn from(map: ConfigMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<ConfigNode>> From<Option<T>> for ConfigNode {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}
