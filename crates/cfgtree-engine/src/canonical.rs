//! Canonical form
//!
//! Normalizes a raw tree into a deterministic shape: empty containers are
//! pruned from maps, foreign objects become plain maps or lists, and every
//! map is sorted by key in ascending byte order.

use cfgtree_node::{ConfigMap, ConfigNode, Entries, Shape, ToOrderedMap};

/// Canonicalize any decoded value
///
/// Children are canonicalized and pruned before their parent map is
/// checked and sorted. Empty strings and nulls are kept; lists are never
/// pruned or reordered.
#[must_use]
pub fn canonicalize(source: &dyn ToOrderedMap) -> ConfigNode {
    match source.shape() {
        Shape::Scalar(s) => ConfigNode::Scalar(s),
        Shape::List(items) => ConfigNode::List(items.map(canonicalize).collect()),
        Shape::Map(entries) => {
            let mut map = pruned(entries);
            map.sort_keys();
            ConfigNode::Map(map)
        }
        Shape::Object(entries) => object(entries),
    }
}

/// Check that a tree is already in canonical form
#[must_use]
pub fn is_canonical(node: &ConfigNode) -> bool {
    match node {
        ConfigNode::Scalar(_) => true,
        ConfigNode::List(items) => items.iter().all(is_canonical),
        ConfigNode::Map(map) => {
            map.keys().zip(map.keys().skip(1)).all(|(a, b)| a < b)
                && map
                    .values()
                    .all(|v| !v.is_empty_container() && is_canonical(v))
        }
    }
}

fn pruned(entries: Entries<'_>) -> ConfigMap {
    entries
        .map(|(key, value)| (key.into_owned(), canonicalize(value)))
        .filter(|(_, value)| !value.is_empty_container())
        .collect()
}

// Objects whose keys are exactly the indices 0..n become lists
fn object(entries: Entries<'_>) -> ConfigNode {
    let mut map = pruned(entries);
    if let Some(positions) = sequence_positions(&map) {
        let mut values: Vec<Option<ConfigNode>> = map.into_values().map(Some).collect();
        return ConfigNode::List(
            positions
                .into_iter()
                .filter_map(|at| values.get_mut(at).and_then(Option::take))
                .collect(),
        );
    }
    map.sort_keys();
    ConfigNode::Map(map)
}

/// For each index `i` in `0..len`, the map position holding key `i`
fn sequence_positions(map: &ConfigMap) -> Option<Vec<usize>> {
    if map.is_empty() {
        return None;
    }
    let mut positions = vec![None; map.len()];
    for (at, key) in map.keys().enumerate() {
        let index: usize = key.parse().ok()?;
        if index.to_string() != *key {
            return None;
        }
        *positions.get_mut(index)? = Some(at);
    }
    positions.into_iter().collect()
}
