//! Testing utilities for cfgtree workspace
//!
//! Shared fixtures, identifier generators, proptest strategies and tracing
//! setup.

#![allow(missing_docs)]

use std::borrow::Cow;

use cfgtree_node::{ConfigMap, ConfigNode, Shape, ToOrderedMap};
use proptest::prelude::*;

pub const ID_A: &str = "6f1c2b3a-4d5e-4f60-8a7b-9c0d1e2f3a4b";
pub const ID_B: &str = "b7e8d9c0-1a2b-4c3d-9e4f-5a6b7c8d9e0f";

/// Install a test-writer subscriber once; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh random identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Raw tree mixing plain nodes with foreign objects
#[derive(Debug, Clone)]
pub enum Raw {
    /// Already-plain subtree
    Node(ConfigNode),
    /// Native map
    Map(Vec<(String, Raw)>),
    /// Foreign object exposing key/value pairs
    Object(Vec<(String, Raw)>),
}

impl Raw {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Raw)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Object whose fields are named `0`, `1`, ...
    pub fn indexed(values: impl IntoIterator<Item = Raw>) -> Self {
        Self::Object(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        )
    }

    pub fn node(value: impl Into<ConfigNode>) -> Self {
        Self::Node(value.into())
    }
}

impl ToOrderedMap for Raw {
    fn shape(&self) -> Shape<'_> {
        match self {
            Self::Node(node) => node.shape(),
            Self::Map(entries) => Shape::Map(Box::new(
                entries
                    .iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn ToOrderedMap)),
            )),
            Self::Object(entries) => Shape::Object(Box::new(
                entries
                    .iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn ToOrderedMap)),
            )),
        }
    }
}

/// `{foo: "thing", assoc: {some: "thing", foo: ["bar", "baz"]}}`
pub fn assoc_tree() -> ConfigNode {
    ConfigNode::map([
        ("foo", ConfigNode::from("thing")),
        (
            "assoc",
            ConfigNode::map([
                ("some", ConfigNode::from("thing")),
                ("foo", ConfigNode::list(["bar", "baz"])),
            ]),
        ),
    ])
}

/// `{empty: [], emptier: "", gone: null, obj: <object {0: "okay"}>}`
pub fn noisy_tree() -> Raw {
    Raw::map([
        ("empty", Raw::node(ConfigNode::empty_list())),
        ("emptier", Raw::node("")),
        ("gone", Raw::node(ConfigNode::null())),
        ("obj", Raw::indexed([Raw::node("okay")])),
    ])
}

/// Top-level tree with one group of given entities and a metadata counter
pub fn group_tree(
    date_modified: i64,
    group: &str,
    entities: Vec<(&str, ConfigNode)>,
) -> ConfigNode {
    let entities: ConfigMap = entities.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ConfigNode::map([
        ("dateModified", ConfigNode::from(date_modified)),
        (group, ConfigNode::Map(entities)),
    ])
}

/// Plain map keys; never collide with reserved tokens
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,5}"
}

/// Canonical UUID text
pub fn arb_identifier() -> impl Strategy<Value = String> {
    any::<u128>().prop_map(|n| uuid::Uuid::from_u128(n).to_string())
}

pub fn arb_scalar() -> impl Strategy<Value = ConfigNode> {
    prop_oneof![
        Just(ConfigNode::null()),
        any::<bool>().prop_map(ConfigNode::from),
        any::<i64>().prop_map(ConfigNode::from),
        (-1.0e6..1.0e6f64).prop_map(ConfigNode::from),
        "[a-z ]{0,8}".prop_map(ConfigNode::from),
    ]
}

/// Arbitrary tree with unsorted maps and empty containers
pub fn arb_tree() -> impl Strategy<Value = ConfigNode> {
    arb_scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigNode::List),
            prop::collection::vec((arb_key(), inner), 0..5)
                .prop_map(|entries| ConfigNode::Map(entries.into_iter().collect())),
        ]
    })
}

/// Map-rooted tree mixing identifier groups, mixed groups and metadata
pub fn arb_project_tree() -> impl Strategy<Value = ConfigNode> {
    let entity_group = prop::collection::vec((arb_identifier(), arb_tree()), 1..4)
        .prop_map(|entries| ConfigNode::Map(entries.into_iter().collect()));
    let entities = prop::collection::vec((arb_identifier(), arb_tree()), 1..3);
    let mixed_group = (arb_key(), arb_tree(), entities).prop_map(|(key, value, entities)| {
        let mut map: ConfigMap = entities.into_iter().collect();
        map.insert(key, value);
        ConfigNode::Map(map)
    });
    let group = prop_oneof![entity_group, mixed_group, arb_tree()];

    (
        any::<u32>(),
        prop::collection::vec((arb_key(), group), 0..6),
    )
        .prop_map(|(date_modified, groups)| {
            let mut root: ConfigMap = groups.into_iter().collect();
            root.insert("dateModified".to_string(), ConfigNode::from(u64::from(date_modified)));
            ConfigNode::Map(root)
        })
}
