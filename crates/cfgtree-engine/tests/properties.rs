use cfgtree_engine::identifier::all_identifiers;
use cfgtree_engine::{
    canonicalize, is_canonical, merge, pack, split, unpack, DocumentPath, Engine, EngineConfig,
    DEFAULT_ASSOC_MARKER,
};
use cfgtree_node::ConfigNode;
use cfgtree_test_utils::{arb_project_tree, arb_tree};
use proptest::prelude::*;

fn keys_sorted_everywhere(node: &ConfigNode) -> bool {
    match node {
        ConfigNode::Scalar(_) => true,
        ConfigNode::List(items) => items.iter().all(keys_sorted_everywhere),
        ConfigNode::Map(map) => {
            map.keys().zip(map.keys().skip(1)).all(|(a, b)| a.as_bytes() < b.as_bytes())
                && map.values().all(keys_sorted_everywhere)
        }
    }
}

fn no_empty_map_values(node: &ConfigNode) -> bool {
    match node {
        ConfigNode::Scalar(_) => true,
        ConfigNode::List(items) => items.iter().all(no_empty_map_values),
        ConfigNode::Map(map) => map
            .values()
            .all(|v| !v.is_empty_container() && no_empty_map_values(v)),
    }
}

fn count_null_and_empty_strings(node: &ConfigNode) -> usize {
    match node {
        ConfigNode::Scalar(_) => {
            usize::from(node.as_str() == Some("") || *node == ConfigNode::null())
        }
        ConfigNode::List(items) => items.iter().map(count_null_and_empty_strings).sum(),
        ConfigNode::Map(map) => map.values().map(count_null_and_empty_strings).sum(),
    }
}

proptest! {
    #[test]
    fn prop_unpack_inverts_pack(tree in arb_tree()) {
        let canonical = canonicalize(&tree);
        let packed = pack(&canonical, DEFAULT_ASSOC_MARKER).unwrap();
        prop_assert_eq!(unpack(&packed, DEFAULT_ASSOC_MARKER).unwrap(), canonical);

        // order-preserving on non-canonical input too
        let packed = pack(&tree, DEFAULT_ASSOC_MARKER).unwrap();
        prop_assert_eq!(unpack(&packed, DEFAULT_ASSOC_MARKER).unwrap(), tree);
    }

    #[test]
    fn prop_pack_is_idempotent(tree in arb_tree()) {
        let once = pack(&tree, DEFAULT_ASSOC_MARKER).unwrap();
        prop_assert_eq!(pack(&once, DEFAULT_ASSOC_MARKER).unwrap(), once);
    }

    #[test]
    fn prop_packed_tree_has_only_wrapper_maps(tree in arb_tree()) {
        fn is_packed_pair(pair: &ConfigNode) -> bool {
            pair.as_list().map_or(false, |kv| kv.len() == 2 && check(&kv[1]))
        }

        fn check(node: &ConfigNode) -> bool {
            match node {
                ConfigNode::Scalar(_) => true,
                ConfigNode::List(items) => items.iter().all(check),
                ConfigNode::Map(map) => {
                    let pairs = map.get(DEFAULT_ASSOC_MARKER).and_then(ConfigNode::as_list);
                    map.len() == 1
                        && pairs.map_or(false, |pairs| pairs.iter().all(is_packed_pair))
                }
            }
        }
        prop_assert!(check(&pack(&tree, DEFAULT_ASSOC_MARKER).unwrap()));
    }

    #[test]
    fn prop_canonicalize_is_idempotent(tree in arb_tree()) {
        let once = canonicalize(&tree);
        prop_assert_eq!(canonicalize(&once), once.clone());
        prop_assert!(is_canonical(&once));
    }

    #[test]
    fn prop_canonical_keys_sorted(tree in arb_tree()) {
        prop_assert!(keys_sorted_everywhere(&canonicalize(&tree)));
    }

    #[test]
    fn prop_canonical_prunes_only_empty_containers(tree in arb_tree()) {
        let canonical = canonicalize(&tree);
        prop_assert!(no_empty_map_values(&canonical));
        // nulls and empty strings are never dropped
        prop_assert_eq!(
            count_null_and_empty_strings(&canonical),
            count_null_and_empty_strings(&tree)
        );
    }

    #[test]
    fn prop_merge_inverts_split(tree in arb_project_tree()) {
        let config = EngineConfig::default();
        let canonical = canonicalize(&tree);
        let documents = split(&canonical, &config).unwrap();
        prop_assert_eq!(merge(&documents).unwrap(), canonical);
    }

    #[test]
    fn prop_split_is_all_or_nothing(tree in arb_project_tree()) {
        let config = EngineConfig::default();
        let canonical = canonicalize(&tree);
        let documents = split(&canonical, &config).unwrap();
        let primary = documents.primary().unwrap();

        for (key, value) in canonical.as_map().unwrap() {
            let splittable = key != config.metadata_key()
                && value.as_map().map_or(false, |group| all_identifiers(group.keys()));
            if splittable {
                prop_assert!(primary.get(key).is_none());
                for (id, entity) in value.as_map().unwrap() {
                    let path = DocumentPath::satellite(key.as_str(), id.as_str());
                    prop_assert_eq!(documents.get(&path), Some(entity));
                }
            } else {
                prop_assert_eq!(primary.get(key), Some(value));
                prop_assert!(documents.satellites().all(|(group, _, _)| group != key));
            }
        }
    }

    #[test]
    fn prop_engine_store_load_roundtrip(tree in arb_project_tree()) {
        let engine = Engine::default();
        let stored = engine.store(&tree).unwrap();
        prop_assert_eq!(engine.load(&stored).unwrap(), canonicalize(&tree));
    }
}
