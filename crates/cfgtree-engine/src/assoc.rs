//! Associative packing
//!
//! Serialization formats whose containers cannot tell an ordered map from a
//! list may reorder or reinterpret maps. [`pack`] re-encodes every map as
//! `{marker: [[key, value], ...]}` in iteration order and [`unpack`]
//! restores it.

use cfgtree_node::{ConfigMap, ConfigNode, NodePath, Scalar};

use crate::error::{PackError, UnpackError};

/// Treatment of maps that already look packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrappers {
    /// Well-formed wrappers pass through
    Keep,
    /// Every use of the marker key is a collision
    Reject,
}

/// Re-encode every map of a tree as a marker-tagged pair list
///
/// Already packed wrappers are kept, so packing a packed tree is a no-op.
/// Use [`pack_strict`] for trees that have never been packed.
///
/// # Errors
/// Returns [`PackError::ReservedKeyCollision`] when a map uses the marker
/// as a literal key.
pub fn pack(node: &ConfigNode, marker: &str) -> Result<ConfigNode, PackError> {
    pack_at(node, marker, Wrappers::Keep, &NodePath::root())
}

/// Pack a raw tree, rejecting every map that holds the marker key
///
/// # Errors
/// Returns [`PackError::ReservedKeyCollision`] for any map containing the
/// marker, including maps shaped like packed wrappers.
pub fn pack_strict(node: &ConfigNode, marker: &str) -> Result<ConfigNode, PackError> {
    pack_at(node, marker, Wrappers::Reject, &NodePath::root())
}

fn pack_at(
    node: &ConfigNode,
    marker: &str,
    wrappers: Wrappers,
    path: &NodePath,
) -> Result<ConfigNode, PackError> {
    match node {
        ConfigNode::Scalar(_) => Ok(node.clone()),
        ConfigNode::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| pack_at(item, marker, wrappers, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigNode::List),
        ConfigNode::Map(map) => {
            let existing = match wrappers {
                Wrappers::Keep => packed_pairs(map, marker),
                Wrappers::Reject => None,
            };
            if let Some(pairs) = existing {
                let repacked = pairs
                    .into_iter()
                    .map(|(key, value)| {
                        let packed = pack_at(value, marker, wrappers, &path.key(key.as_str()))?;
                        Ok(pair(ConfigNode::from(key), packed))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(wrap(marker, repacked));
            }
            if map.contains_key(marker) {
                return Err(PackError::ReservedKeyCollision {
                    path: path.key(marker),
                    marker: marker.to_string(),
                });
            }
            let pairs = map
                .iter()
                .map(|(key, value)| {
                    let packed = pack_at(value, marker, wrappers, &path.key(key.as_str()))?;
                    Ok(pair(ConfigNode::from(key.as_str()), packed))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(wrap(marker, pairs))
        }
    }
}

/// Restore maps from their marker-tagged pair lists
///
/// Maps without the marker are walked as they are.
///
/// # Errors
/// Fails fast on a marker whose value is not a list of `[key, value]` pairs
/// with string-like, unique keys.
pub fn unpack(node: &ConfigNode, marker: &str) -> Result<ConfigNode, UnpackError> {
    unpack_at(node, marker, &NodePath::root())
}

fn unpack_at(node: &ConfigNode, marker: &str, path: &NodePath) -> Result<ConfigNode, UnpackError> {
    match node {
        ConfigNode::Scalar(_) => Ok(node.clone()),
        ConfigNode::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| unpack_at(item, marker, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigNode::List),
        ConfigNode::Map(map) if map.len() == 1 && map.contains_key(marker) => {
            let pairs = match map.get(marker) {
                Some(ConfigNode::List(pairs)) => pairs,
                other => {
                    return Err(UnpackError::MarkerNotList {
                        path: path.clone(),
                        found: other.map_or("null", ConfigNode::kind),
                    })
                }
            };
            let mut out = ConfigMap::with_capacity(pairs.len());
            for (index, element) in pairs.iter().enumerate() {
                let (key, value) = match element {
                    ConfigNode::List(kv) if kv.len() == 2 => (&kv[0], &kv[1]),
                    other => {
                        return Err(UnpackError::MalformedPair {
                            path: path.clone(),
                            index,
                            found: describe(other),
                        })
                    }
                };
                let key = key
                    .as_scalar()
                    .and_then(Scalar::key_text)
                    .ok_or_else(|| UnpackError::InvalidPairKey {
                        path: path.clone(),
                        index,
                        found: key.kind(),
                    })?;
                if out.contains_key(&key) {
                    return Err(UnpackError::DuplicateKey {
                        path: path.clone(),
                        key,
                    });
                }
                let value = unpack_at(value, marker, &path.key(key.as_str()))?;
                out.insert(key, value);
            }
            Ok(ConfigNode::Map(out))
        }
        ConfigNode::Map(map) => map
            .iter()
            .map(|(key, value)| {
                let value = unpack_at(value, marker, &path.key(key.as_str()))?;
                Ok((key.clone(), value))
            })
            .collect::<Result<ConfigMap, _>>()
            .map(ConfigNode::Map),
    }
}

/// Pairs of a well-formed packed wrapper, `None` for anything else
fn packed_pairs<'a>(map: &'a ConfigMap, marker: &str) -> Option<Vec<(String, &'a ConfigNode)>> {
    if map.len() != 1 {
        return None;
    }
    let ConfigNode::List(elements) = map.get(marker)? else {
        return None;
    };
    elements
        .iter()
        .map(|element| match element.as_list()? {
            [key, value] => Some((key.as_scalar()?.key_text()?, value)),
            _ => None,
        })
        .collect()
}

fn pair(key: ConfigNode, value: ConfigNode) -> ConfigNode {
    ConfigNode::List(vec![key, value])
}

fn wrap(marker: &str, pairs: Vec<ConfigNode>) -> ConfigNode {
    let mut map = ConfigMap::with_capacity(1);
    map.insert(marker.to_string(), ConfigNode::List(pairs));
    ConfigNode::Map(map)
}

fn describe(node: &ConfigNode) -> String {
    match node {
        ConfigNode::List(items) => format!("list of {}", items.len()),
        other => other.kind().to_string(),
    }
}
