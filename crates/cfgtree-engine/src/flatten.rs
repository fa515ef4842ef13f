//! Flattened views and change detection
//!
//! [`flatten`] lists every leaf of a tree by path; [`diff`] compares two
//! flattened trees so a storage layer can report which settings a pending
//! change touches.

use cfgtree_node::{ConfigNode, NodePath};
use indexmap::IndexMap;

/// Every leaf (scalar, empty list, empty map) keyed by its path, in tree order
#[must_use]
pub fn flatten(tree: &ConfigNode) -> IndexMap<NodePath, ConfigNode> {
    let mut out = IndexMap::new();
    walk(tree, NodePath::root(), &mut out);
    out
}

fn walk(node: &ConfigNode, path: NodePath, out: &mut IndexMap<NodePath, ConfigNode>) {
    match node {
        ConfigNode::List(items) if !items.is_empty() => {
            for (i, item) in items.iter().enumerate() {
                walk(item, path.index(i), out);
            }
        }
        ConfigNode::Map(map) if !map.is_empty() => {
            for (key, value) in map {
                walk(value, path.key(key.as_str()), out);
            }
        }
        leaf => {
            out.insert(path, leaf.clone());
        }
    }
}

/// Single leaf-level difference between two trees
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Leaf only present in the new tree
    Added { path: NodePath, value: ConfigNode },
    /// Leaf only present in the old tree
    Removed { path: NodePath, value: ConfigNode },
    /// Leaf present in both with different values
    Modified {
        path: NodePath,
        old: ConfigNode,
        new: ConfigNode,
    },
}

impl Change {
    #[inline]
    #[must_use]
    pub fn path(&self) -> &NodePath {
        match self {
            Self::Added { path, .. }
            | Self::Removed { path, .. }
            | Self::Modified { path, .. } => path,
        }
    }
}

/// Leaf-level changes from `old` to `new`
///
/// Removals and modifications come first in `old` order, then additions in
/// `new` order. Unchanged leaves are omitted.
#[must_use]
pub fn diff(old: &ConfigNode, new: &ConfigNode) -> Vec<Change> {
    let before = flatten(old);
    let mut after = flatten(new);
    let mut changes = Vec::new();

    for (path, old_value) in before {
        match after.shift_remove(&path) {
            Some(new_value) if new_value == old_value => {}
            Some(new_value) => changes.push(Change::Modified {
                path,
                old: old_value,
                new: new_value,
            }),
            None => changes.push(Change::Removed { path, value: old_value }),
        }
    }
    changes.extend(
        after
            .into_iter()
            .map(|(path, value)| Change::Added { path, value }),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> NodePath {
        s.parse().unwrap()
    }

    #[test]
    fn flatten_lists_leaves_in_order() {
        let tree = ConfigNode::from(json!({"b": {"c": 1, "d": [true, {}]}, "a": ""}));
        let flat = flatten(&tree);
        let paths: Vec<String> = flat.keys().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["b.c", "b.d[0]", "b.d[1]", "a"]);
        assert_eq!(flat[&path("b.d[1]")], ConfigNode::empty_map());
    }

    #[test]
    fn flatten_scalar_root() {
        let flat = flatten(&ConfigNode::from(5));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[&NodePath::root()], ConfigNode::from(5));
    }

    #[test]
    fn diff_reports_each_kind() {
        let old = ConfigNode::from(json!({"email": {"host": "a", "port": 25}, "name": "site"}));
        let new = ConfigNode::from(json!({"email": {"host": "b"}, "name": "site", "lang": "en"}));
        let changes = diff(&old, &new);
        assert_eq!(
            changes,
            vec![
                Change::Modified {
                    path: path("email.host"),
                    old: ConfigNode::from("a"),
                    new: ConfigNode::from("b"),
                },
                Change::Removed {
                    path: path("email.port"),
                    value: ConfigNode::from(25),
                },
                Change::Added {
                    path: path("lang"),
                    value: ConfigNode::from("en"),
                },
            ]
        );
    }

    #[test]
    fn diff_sees_list_replaced_by_indexed_map() {
        let old = ConfigNode::from(json!({"x": ["v"]}));
        let new = ConfigNode::from(json!({"x": {"0": "v"}}));
        assert_eq!(
            diff(&old, &new),
            vec![
                Change::Removed {
                    path: path("x[0]"),
                    value: ConfigNode::from("v"),
                },
                Change::Added {
                    path: path("x.0"),
                    value: ConfigNode::from("v"),
                },
            ]
        );
    }

    #[test]
    fn diff_of_equal_trees_is_empty() {
        let tree = ConfigNode::from(json!({"a": [1, 2, {"b": null}]}));
        assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn change_path_accessor() {
        let change = Change::Added {
            path: path("x.y"),
            value: ConfigNode::null(),
        };
        assert_eq!(change.path().to_string(), "x.y");
    }
}
