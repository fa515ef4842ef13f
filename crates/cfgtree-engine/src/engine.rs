//! Storage and load pipelines
//!
//! [`Engine`] binds an [`EngineConfig`] to the transforms:
//!
//! ```text
//! store: raw → canonicalize → split → pack (per document) → StoredDocuments
//! load:  StoredDocuments → unpack (per document) → merge → canonical tree
//! ```

use cfgtree_node::{ConfigNode, NodeDigest, ToOrderedMap};
use indexmap::IndexMap;

use crate::assoc;
use crate::canonical;
use crate::config::EngineConfig;
use crate::decompose::{self, DocumentPath, DocumentSet};
use crate::error::{
    ConfigError, EngineError, EngineResult, MergeError, PackError, SplitError, UnpackError,
};
use crate::flatten::{self, Change};

/// Packed documents keyed by logical path, ready for a serializer
pub type StoredDocuments = IndexMap<String, ConfigNode>;

/// Configured transform pipeline
///
/// Stateless between calls; cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create engine with validated configuration
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration is ambiguous
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn canonicalize(&self, raw: &dyn ToOrderedMap) -> ConfigNode {
        canonical::canonicalize(raw)
    }

    /// Pack with the configured marker
    ///
    /// # Errors
    /// See [`assoc::pack`]
    pub fn pack(&self, node: &ConfigNode) -> Result<ConfigNode, PackError> {
        assoc::pack(node, self.config.assoc_marker())
    }

    /// Unpack with the configured marker
    ///
    /// # Errors
    /// See [`assoc::unpack`]
    pub fn unpack(&self, node: &ConfigNode) -> Result<ConfigNode, UnpackError> {
        assoc::unpack(node, self.config.assoc_marker())
    }

    /// # Errors
    /// See [`decompose::split`]
    pub fn split(&self, tree: &ConfigNode) -> Result<DocumentSet, SplitError> {
        decompose::split(tree, &self.config)
    }

    /// # Errors
    /// See [`decompose::merge`]
    pub fn merge(&self, documents: &DocumentSet) -> Result<ConfigNode, MergeError> {
        decompose::merge(documents)
    }

    #[must_use]
    pub fn diff(&self, old: &ConfigNode, new: &ConfigNode) -> Vec<Change> {
        flatten::diff(old, new)
    }

    /// Produce packed documents for a raw tree
    ///
    /// # Errors
    /// Fails when the canonical root is not a map or a document uses the
    /// associative marker as a literal key
    pub fn store(&self, raw: &dyn ToOrderedMap) -> EngineResult<StoredDocuments> {
        let canonical = self.canonicalize(raw);
        let documents = self.split(&canonical)?;
        tracing::debug!("split configuration into {} documents", documents.len());

        let mut stored = StoredDocuments::with_capacity(documents.len());
        for (path, document) in documents {
            let logical = path.to_logical(&self.config);
            let packed = assoc::pack_strict(&document, self.config.assoc_marker())
                .map_err(|source| EngineError::Pack {
                    document: logical.clone(),
                    source,
                })?;
            stored.insert(logical, packed);
        }
        Ok(stored)
    }

    /// Rebuild the canonical tree from packed documents
    ///
    /// # Errors
    /// Fails on unparsable logical paths, malformed packed maps, or
    /// documents that cannot be reassembled
    pub fn load(&self, stored: &StoredDocuments) -> EngineResult<ConfigNode> {
        let mut documents = DocumentSet::default();
        for (logical, packed) in stored {
            let path = DocumentPath::parse(logical, &self.config)?;
            let document = self.unpack(packed).map_err(|source| EngineError::Unpack {
                document: logical.clone(),
                source,
            })?;
            documents.insert(path, document);
        }
        if documents.is_empty() {
            tracing::warn!("no stored documents to load");
        }
        let tree = self.merge(&documents)?;
        tracing::debug!("loaded configuration from {} documents", stored.len());
        Ok(tree)
    }

    /// Digest of every stored document, keyed by logical path
    #[must_use]
    pub fn digests(&self, stored: &StoredDocuments) -> IndexMap<String, NodeDigest> {
        stored
            .iter()
            .map(|(logical, doc)| (logical.clone(), NodeDigest::compute(doc)))
            .collect()
    }

    /// Logical paths whose documents differ between two stored sets
    ///
    /// Includes documents present on only one side.
    #[must_use]
    pub fn changed_documents(&self, old: &StoredDocuments, new: &StoredDocuments) -> Vec<String> {
        let before = self.digests(old);
        let after = self.digests(new);
        let mut changed: Vec<String> = before
            .iter()
            .filter(|(logical, digest)| after.get(*logical) != Some(*digest))
            .map(|(logical, _)| logical.clone())
            .collect();
        changed.extend(after.keys().filter(|l| !before.contains_key(*l)).cloned());
        if !changed.is_empty() {
            tracing::info!("{} of {} documents changed", changed.len(), after.len());
        }
        changed
    }
}
