//! Conversion capability for decoded values
//!
//! [`ToOrderedMap`] lets any decoded representation present itself as a
//! configuration tree without runtime type inspection. Foreign object-like
//! values (e.g. tagged YAML nodes, application records) report
//! [`Shape::Object`] so the canonicalizer can coerce them.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Number;

use crate::node::{ConfigMap, ConfigNode, Scalar};

/// Borrowed iterator over key/value pairs
pub type Entries<'a> = Box<dyn Iterator<Item = (Cow<'a, str>, &'a dyn ToOrderedMap)> + 'a>;

/// Borrowed iterator over list elements
pub type Items<'a> = Box<dyn Iterator<Item = &'a dyn ToOrderedMap> + 'a>;

/// Structural view of a value
pub enum Shape<'a> {
    /// Leaf value
    Scalar(Scalar),
    /// Positional sequence
    List(Items<'a>),
    /// Native ordered mapping
    Map(Entries<'a>),
    /// Structured value that is not natively a map but exposes key/value pairs
    Object(Entries<'a>),
}

/// A value that can present itself as a configuration tree
pub trait ToOrderedMap {
    /// Structural view of this value
    fn shape(&self) -> Shape<'_>;
}

impl ConfigNode {
    /// Structural copy of any [`ToOrderedMap`] value
    ///
    /// No pruning and no sorting: objects become maps in their own order.
    /// Duplicate keys keep the last value.
    #[must_use]
    pub fn from_source(source: &dyn ToOrderedMap) -> Self {
        match source.shape() {
            Shape::Scalar(s) => Self::Scalar(s),
            Shape::List(items) => Self::List(items.map(Self::from_source).collect()),
            Shape::Map(entries) | Shape::Object(entries) => Self::Map(
                entries
                    .map(|(k, v)| (k.into_owned(), Self::from_source(v)))
                    .collect::<ConfigMap>(),
            ),
        }
    }
}

impl ToOrderedMap for ConfigNode {
    fn shape(&self) -> Shape<'_> {
        match self {
            Self::Scalar(s) => Shape::Scalar(s.clone()),
            Self::List(items) => Shape::List(list_items(items)),
            Self::Map(map) => Shape::Map(Box::new(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn ToOrderedMap)),
            )),
        }
    }
}

impl ToOrderedMap for Scalar {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(self.clone())
    }
}

impl ToOrderedMap for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::String(self.clone()))
    }
}

impl ToOrderedMap for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

impl ToOrderedMap for i64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Number((*self).into()))
    }
}

impl ToOrderedMap for u64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Number((*self).into()))
    }
}

impl ToOrderedMap for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::from_f64(*self))
    }
}

impl<T: ToOrderedMap> ToOrderedMap for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Scalar(Scalar::Null),
        }
    }
}

impl<T: ToOrderedMap> ToOrderedMap for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::List(list_items(self))
    }
}

impl<T: ToOrderedMap> ToOrderedMap for IndexMap<String, T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn ToOrderedMap)),
        ))
    }
}

impl ToOrderedMap for serde_json::Value {
    fn shape(&self) -> Shape<'_> {
        use serde_json::Value;

        match self {
            Value::Null => Shape::Scalar(Scalar::Null),
            Value::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Shape::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Shape::Scalar(Scalar::String(s.clone())),
            Value::Array(items) => Shape::List(list_items(items)),
            Value::Object(map) => Shape::Map(Box::new(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn ToOrderedMap)),
            )),
        }
    }
}

impl ToOrderedMap for serde_yaml::Value {
    fn shape(&self) -> Shape<'_> {
        use serde_yaml::Value;

        match self {
            Value::Null => Shape::Scalar(Scalar::Null),
            Value::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Shape::Scalar(yaml_number(n)),
            Value::String(s) => Shape::Scalar(Scalar::String(s.clone())),
            Value::Sequence(items) => Shape::List(list_items(items)),
            Value::Mapping(map) => Shape::Map(yaml_entries(map)),
            // `!Tag {..}` is an application object; other tags are dropped
            Value::Tagged(tagged) => match &tagged.value {
                Value::Mapping(map) => Shape::Object(yaml_entries(map)),
                inner => inner.shape(),
            },
        }
    }
}

fn list_items<T: ToOrderedMap>(items: &[T]) -> Items<'_> {
    Box::new(items.iter().map(|v| v as &dyn ToOrderedMap))
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Number(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Scalar::Number(Number::from(u))
    } else {
        n.as_f64().map_or(Scalar::Null, Scalar::from_f64)
    }
}

fn yaml_entries(map: &serde_yaml::Mapping) -> Entries<'_> {
    Box::new(
        map.iter()
            .map(|(k, v)| (yaml_key(k), v as &dyn ToOrderedMap)),
    )
}

/// Stringify a YAML mapping key
fn yaml_key(key: &serde_yaml::Value) -> Cow<'_, str> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Null => Cow::Borrowed("null"),
        Value::Tagged(tagged) => yaml_key(&tagged.value),
        complex => Cow::Owned(
            serde_yaml::to_string(complex)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        ),
    }
}

impl From<serde_json::Value> for ConfigNode {
    fn from(value: serde_json::Value) -> Self {
        Self::from_source(&value)
    }
}

impl From<serde_yaml::Value> for ConfigNode {
    fn from(value: serde_yaml::Value) -> Self {
        Self::from_source(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_keeps_insertion_order() {
        let node = ConfigNode::from(json!({"b": 1, "a": {"y": true, "x": null}}));
        let expected = ConfigNode::map([
            ("b", ConfigNode::from(1)),
            ("a", ConfigNode::map([("y", ConfigNode::from(true)), ("x", ConfigNode::null())])),
        ]);
        assert_eq!(node, expected);
    }

    #[test]
    fn yaml_keys_are_stringified() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("1: one\ntrue: yes\n~: none\n").unwrap();
        let node = ConfigNode::from(value);
        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "true", "null"]);
    }

    #[test]
    fn yaml_tagged_mapping_is_object() {
        let value: serde_yaml::Value = serde_yaml::from_str("!Record {0: okay}").unwrap();
        assert!(matches!(value.shape(), Shape::Object(_)));

        let scalar: serde_yaml::Value = serde_yaml::from_str("!Secret hunter2").unwrap();
        assert!(matches!(scalar.shape(), Shape::Scalar(Scalar::String(s)) if s == "hunter2"));
    }

    #[test]
    fn from_source_copies_objects_as_maps() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("wrapped: !Record {b: 2, a: 1}").unwrap();
        let node = ConfigNode::from(value);
        let wrapped = node.get("wrapped").and_then(ConfigNode::as_map).unwrap();
        assert_eq!(wrapped.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn native_rust_values_have_shapes() {
        let items: Vec<Option<i64>> = vec![Some(3), None];
        let node = ConfigNode::from_source(&items);
        assert_eq!(node, ConfigNode::list([ConfigNode::from(3), ConfigNode::null()]));
    }

    #[test]
    fn yaml_float_and_unsigned_numbers() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("[1.5, 18446744073709551615, .nan]").unwrap();
        let node = ConfigNode::from(value);
        let items = node.as_list().unwrap();
        assert_eq!(items[0], ConfigNode::from(1.5));
        assert_eq!(items[1], ConfigNode::from(u64::MAX));
        assert_eq!(items[2], ConfigNode::null());
    }
}
