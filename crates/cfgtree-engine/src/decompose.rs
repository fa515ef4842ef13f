//! Document decomposition
//!
//! Splits a canonical tree into a primary document plus one satellite
//! document per entity of every top-level group whose keys are all
//! identifiers, and merges them back.
//!
//! Only the top level is decomposed. Identifier-keyed maps nested inside an
//! entity stay inside that entity's satellite.

use std::fmt::{self, Display, Formatter};

use cfgtree_node::{ConfigMap, ConfigNode, NodeDigest};
use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::error::{MergeError, SplitError};
use crate::identifier::{all_identifiers, is_identifier};

/// Address of a produced document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentPath {
    /// Root document
    Primary,
    /// One entity of an identifier-keyed group
    Satellite {
        /// Top-level group key
        group: String,
        /// Entity identifier
        id: String,
    },
}

impl DocumentPath {
    /// Create satellite path
    #[inline]
    #[must_use]
    pub fn satellite(group: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Satellite {
            group: group.into(),
            id: id.into(),
        }
    }

    /// Logical path string: `<root-file>` or `<group>/<id>.<ext>`
    #[must_use]
    pub fn to_logical(&self, config: &EngineConfig) -> String {
        match self {
            Self::Primary => config.root_file.clone(),
            Self::Satellite { group, id } => format!("{group}/{id}.{}", config.extension),
        }
    }

    /// Parse a logical path string
    ///
    /// The group is everything before the last `/`, so group keys may
    /// themselves contain separators.
    ///
    /// # Errors
    /// Returns [`MergeError::InvalidPath`] for anything other than the root
    /// file or `<group>/<id>.<ext>` with an identifier `id`.
    pub fn parse(logical: &str, config: &EngineConfig) -> Result<Self, MergeError> {
        if logical == config.root_file {
            return Ok(Self::Primary);
        }
        let (group, file) = logical
            .rsplit_once('/')
            .ok_or_else(|| MergeError::invalid_path(logical, "missing group separator"))?;
        let id = file
            .strip_suffix(config.extension.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(|| MergeError::invalid_path(logical, "unexpected extension"))?;
        if !is_identifier(id) {
            return Err(MergeError::invalid_path(logical, "file name is not an identifier"));
        }
        Ok(Self::satellite(group, id))
    }
}

impl Display for DocumentPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("<primary>"),
            Self::Satellite { group, id } => write!(f, "{group}/{id}"),
        }
    }
}

/// Documents produced by [`split`], keyed by address
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSet {
    documents: IndexMap<DocumentPath, ConfigNode>,
}

impl DocumentSet {
    /// Create set holding only a primary document
    #[must_use]
    pub fn new(primary: ConfigNode) -> Self {
        let mut documents = IndexMap::new();
        documents.insert(DocumentPath::Primary, primary);
        Self { documents }
    }

    /// Insert or replace a document, returning the previous one
    pub fn insert(&mut self, path: DocumentPath, document: ConfigNode) -> Option<ConfigNode> {
        self.documents.insert(path, document)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, path: &DocumentPath) -> Option<&ConfigNode> {
        self.documents.get(path)
    }

    #[inline]
    #[must_use]
    pub fn primary(&self) -> Option<&ConfigNode> {
        self.documents.get(&DocumentPath::Primary)
    }

    /// Satellites as `(group, id, subtree)` in production order
    pub fn satellites(&self) -> impl Iterator<Item = (&str, &str, &ConfigNode)> {
        self.documents.iter().filter_map(|(path, doc)| match path {
            DocumentPath::Satellite { group, id } => Some((group.as_str(), id.as_str(), doc)),
            DocumentPath::Primary => None,
        })
    }

    /// Number of documents, primary included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentPath, &ConfigNode)> {
        self.documents.iter()
    }

    /// Key documents by logical path string
    #[must_use]
    pub fn into_logical(self, config: &EngineConfig) -> IndexMap<String, ConfigNode> {
        self.documents
            .into_iter()
            .map(|(path, doc)| (path.to_logical(config), doc))
            .collect()
    }

    /// Rebuild a set from logical path strings
    ///
    /// # Errors
    /// Returns [`MergeError::InvalidPath`] for unparsable paths
    pub fn from_logical<I>(documents: I, config: &EngineConfig) -> Result<Self, MergeError>
    where
        I: IntoIterator<Item = (String, ConfigNode)>,
    {
        let documents = documents
            .into_iter()
            .map(|(logical, doc)| Ok((DocumentPath::parse(&logical, config)?, doc)))
            .collect::<Result<_, MergeError>>()?;
        Ok(Self { documents })
    }

    /// Digest of every document, keyed by logical path
    #[must_use]
    pub fn digests(&self, config: &EngineConfig) -> IndexMap<String, NodeDigest> {
        self.documents
            .iter()
            .map(|(path, doc)| (path.to_logical(config), NodeDigest::compute(doc)))
            .collect()
    }
}

impl IntoIterator for DocumentSet {
    type Item = (DocumentPath, ConfigNode);
    type IntoIter = indexmap::map::IntoIter<DocumentPath, ConfigNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Split a canonical tree into primary and satellite documents
///
/// A top-level group is split out only when it is a non-empty map whose
/// keys are all identifiers; a single other key keeps the whole group in
/// the primary document. The metadata key always stays in the primary
/// document.
///
/// # Errors
/// Returns [`SplitError::RootNotMap`] when the root is not a map
pub fn split(tree: &ConfigNode, config: &EngineConfig) -> Result<DocumentSet, SplitError> {
    let ConfigNode::Map(root) = tree else {
        return Err(SplitError::RootNotMap { found: tree.kind() });
    };

    let mut primary = ConfigMap::with_capacity(root.len());
    let mut satellites = Vec::new();
    for (key, value) in root {
        match entity_group(key, value, config) {
            Some(entities) => {
                tracing::trace!("splitting group '{}' into {} documents", key, entities.len());
                satellites.extend(entities.iter().map(|(id, entity)| {
                    let path = DocumentPath::satellite(key.as_str(), id.as_str());
                    (path, entity.clone())
                }));
            }
            None => {
                primary.insert(key.clone(), value.clone());
            }
        }
    }

    let mut documents = DocumentSet::new(ConfigNode::Map(primary));
    for (path, entity) in satellites {
        documents.insert(path, entity);
    }
    Ok(documents)
}

fn entity_group<'a>(
    key: &str,
    value: &'a ConfigNode,
    config: &EngineConfig,
) -> Option<&'a ConfigMap> {
    if key == config.metadata_key() {
        return None;
    }
    let entities = value.as_map()?;
    if all_identifiers(entities.keys()) {
        return Some(entities);
    }
    let matching = entities.keys().filter(|k| is_identifier(k)).count();
    if matching > 0 {
        tracing::debug!(
            "group '{}' kept in primary document: {} of {} keys are identifiers",
            key,
            matching,
            entities.len()
        );
    }
    None
}

/// Reassemble documents into one tree
///
/// Primary key order is kept. Group keys and entity ids are inserted at
/// their sorted position, which reproduces the canonical tree exactly.
///
/// # Errors
/// Fails on a missing or non-map primary document, a group key held by the
/// primary document as a non-map, or an entity defined twice.
pub fn merge(documents: &DocumentSet) -> Result<ConfigNode, MergeError> {
    let primary = documents.primary().ok_or(MergeError::MissingPrimary)?;
    let ConfigNode::Map(primary) = primary else {
        return Err(MergeError::RootNotMap { found: primary.kind() });
    };

    let mut root = primary.clone();
    for (group, id, entity) in documents.satellites() {
        let slot = match root.get_index_of(group) {
            Some(slot) => slot,
            None => insert_sorted(&mut root, group.to_string(), ConfigNode::empty_map()),
        };
        let target = &mut root[slot];
        let found = target.kind();
        let entities = target.as_map_mut().ok_or_else(|| MergeError::GroupConflict {
            group: group.to_string(),
            found,
        })?;
        if entities.contains_key(id) {
            return Err(MergeError::DuplicateEntity {
                group: group.to_string(),
                id: id.to_string(),
            });
        }
        insert_sorted(entities, id.to_string(), entity.clone());
    }
    Ok(ConfigNode::Map(root))
}

/// Insert before the first greater key, returning the position
fn insert_sorted(map: &mut ConfigMap, key: String, value: ConfigNode) -> usize {
    let at = map
        .keys()
        .position(|existing| existing.as_str() > key.as_str())
        .unwrap_or(map.len());
    map.shift_insert(at, key, value);
    at
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID_A: &str = "0c3f9f5e-3b1a-4a52-9d3e-2f6b1c7a8e90";
    const ID_B: &str = "7d2e4a10-9c8b-4f3e-a1d2-5b6c7d8e9f01";

    fn node(value: serde_json::Value) -> ConfigNode {
        ConfigNode::from(value)
    }

    #[test]
    fn logical_paths() {
        let config = EngineConfig::default();
        assert_eq!(DocumentPath::Primary.to_logical(&config), "project.yaml");
        let satellite = DocumentPath::satellite("email", ID_A);
        let logical = satellite.to_logical(&config);
        assert_eq!(logical, format!("email/{ID_A}.yaml"));
        assert_eq!(DocumentPath::parse(&logical, &config).unwrap(), satellite);
        assert_eq!(DocumentPath::parse("project.yaml", &config).unwrap(), DocumentPath::Primary);
    }

    #[test]
    fn group_may_contain_separator() {
        let config = EngineConfig::default();
        let path = DocumentPath::parse(&format!("plugins/seo/{ID_A}.yaml"), &config).unwrap();
        assert_eq!(path, DocumentPath::satellite("plugins/seo", ID_A));
    }

    #[test]
    fn rejects_invalid_logical_paths() {
        let config = EngineConfig::default();
        for logical in [
            "other.yaml".to_string(),
            format!("email/{ID_A}.json"),
            format!("email/{ID_A}yaml"),
            "email/not-an-id.yaml".to_string(),
        ] {
            assert!(
                matches!(
                    DocumentPath::parse(&logical, &config),
                    Err(MergeError::InvalidPath { .. })
                ),
                "{logical} should be rejected"
            );
        }
    }

    #[test]
    fn split_identifier_group() {
        let config = EngineConfig::default();
        let tree = node(json!({
            "dateModified": 3,
            "email": {ID_A: {"key": "value"}, ID_B: {"key": "other"}},
            "system": {"name": "site"}
        }));
        let docs = split(&tree, &config).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs.primary(),
            Some(&node(json!({"dateModified": 3, "system": {"name": "site"}})))
        );
        assert_eq!(
            docs.get(&DocumentPath::satellite("email", ID_A)),
            Some(&node(json!({"key": "value"})))
        );
        let order: Vec<_> = docs.satellites().map(|(_, id, _)| id).collect();
        assert_eq!(order, vec![ID_A, ID_B]);
    }

    #[test]
    fn mixed_group_stays_in_primary() {
        let config = EngineConfig::default();
        let tree = node(json!({
            "dateModified": 4,
            "email": {ID_A: {"key": "value"}, "provider": "gmail"}
        }));
        let docs = split(&tree, &config).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs.primary(), Some(&tree));
    }

    #[test]
    fn metadata_key_never_splits() {
        let config = EngineConfig::default();
        let tree = node(json!({"dateModified": {ID_A: 1}}));
        let docs = split(&tree, &config).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs.primary(), Some(&tree));

        let custom = EngineConfig::new().with_metadata_key("revision");
        assert_eq!(split(&tree, &custom).unwrap().len(), 2);
    }

    #[test]
    fn nested_identifier_groups_stay_in_satellite() {
        let config = EngineConfig::default();
        let tree = node(json!({"sections": {ID_A: {"entryTypes": {ID_B: {"name": "post"}}}}}));
        let docs = split(&tree, &config).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs.get(&DocumentPath::satellite("sections", ID_A)),
            Some(&node(json!({"entryTypes": {ID_B: {"name": "post"}}})))
        );
    }

    #[test]
    fn scalar_and_list_groups_stay_in_primary() {
        let config = EngineConfig::default();
        let tree = node(json!({"a": [ID_A], "b": ID_A}));
        assert_eq!(split(&tree, &config).unwrap().len(), 1);
    }

    #[test]
    fn split_requires_map_root() {
        let config = EngineConfig::default();
        assert_eq!(
            split(&ConfigNode::list([1]), &config),
            Err(SplitError::RootNotMap { found: "list" })
        );
    }

    #[test]
    fn merge_reconstructs_canonical_order() {
        let config = EngineConfig::default();
        let tree = node(json!({
            "a": 1,
            "email": {ID_A: {"k": 1}, ID_B: {"k": 2}},
            "m": {"x": true},
            "users": {ID_B: {"name": "admin"}}
        }));
        let docs = split(&tree, &config).unwrap();
        assert_eq!(merge(&docs).unwrap(), tree);
    }

    #[test]
    fn merge_is_independent_of_satellite_order() {
        let config = EngineConfig::default();
        let tree = node(json!({"email": {ID_A: {"k": 1}, ID_B: {"k": 2}}, "z": 0}));
        let logical = split(&tree, &config).unwrap().into_logical(&config);
        let reversed: Vec<_> = logical.into_iter().rev().collect();
        let docs = DocumentSet::from_logical(reversed, &config).unwrap();
        assert_eq!(merge(&docs).unwrap(), tree);
    }

    #[test]
    fn merge_attaches_satellites_to_existing_group() {
        let mut docs = DocumentSet::new(node(json!({"a": 1, "email": {ID_B: {"k": 2}}})));
        docs.insert(DocumentPath::satellite("email", ID_A), node(json!({"k": 1})));
        assert_eq!(
            merge(&docs).unwrap(),
            node(json!({"a": 1, "email": {ID_A: {"k": 1}, ID_B: {"k": 2}}}))
        );
    }

    #[test]
    fn merge_errors() {
        assert_eq!(merge(&DocumentSet::default()), Err(MergeError::MissingPrimary));

        let mut docs = DocumentSet::new(node(json!({"email": "smtp"})));
        docs.insert(DocumentPath::satellite("email", ID_A), node(json!({"k": 1})));
        assert!(matches!(merge(&docs), Err(MergeError::GroupConflict { found: "string", .. })));

        let mut docs = DocumentSet::new(node(json!({"email": {ID_A: {"k": 0}}})));
        docs.insert(DocumentPath::satellite("email", ID_A), node(json!({"k": 1})));
        assert!(matches!(merge(&docs), Err(MergeError::DuplicateEntity { .. })));

        let docs = DocumentSet::new(ConfigNode::from("flat"));
        assert!(matches!(merge(&docs), Err(MergeError::RootNotMap { found: "string" })));
    }

    #[test]
    fn digests_track_documents() {
        let config = EngineConfig::default();
        let tree = node(json!({"email": {ID_A: {"k": 1}}, "x": 1}));
        let digests = split(&tree, &config).unwrap().digests(&config);
        assert_eq!(digests.len(), 2);
        assert_eq!(
            digests[&format!("email/{ID_A}.yaml")],
            NodeDigest::compute(&node(json!({"k": 1})))
        );
    }
}
