//! cfgtree-codec: text encodings for stored documents
//!
//! The engine stops at [`StoredDocuments`], a map from logical path to
//! packed tree. This crate turns those trees into file contents and back,
//! choosing a [`DocumentCodec`] by the extension of each logical path.
//!
//! # Example
//!
//! ```
//! use cfgtree_codec::default_codecs;
//! use cfgtree_engine::Engine;
//! use cfgtree_node::ConfigNode;
//!
//! let engine = Engine::default();
//! let stored = engine.store(&ConfigNode::map([("name", "demo")])).unwrap();
//!
//! let codecs = default_codecs();
//! let files = codecs.encode_all(&stored).unwrap();
//! assert!(files.contains_key("project.yaml"));
//! assert_eq!(codecs.decode_all(&files).unwrap(), stored);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use cfgtree_engine::StoredDocuments;
use cfgtree_node::ConfigNode;
use indexmap::IndexMap;

pub mod error;
mod json;
mod yaml;

pub use error::CodecError;
pub use json::JsonCodec;
pub use yaml::YamlCodec;

/// Encoded file contents keyed by logical path
pub type EncodedDocuments = IndexMap<String, String>;

/// Text encoding for a single document
pub trait DocumentCodec: Send + Sync + std::fmt::Debug {
    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Render a packed document as text
    fn encode(&self, document: &ConfigNode) -> Result<String, CodecError>;

    /// Parse text into a document without canonicalizing it
    fn decode(&self, text: &str) -> Result<ConfigNode, CodecError>;

    /// Check if this codec handles the given logical path
    fn can_handle(&self, path: &str) -> bool {
        extension_of(path).map_or(false, |ext| self.extensions().contains(&ext))
    }
}

/// Extension of the last path segment, if it has one
fn extension_of(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

/// Codecs looked up by logical path extension
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: Vec<Box<dyn DocumentCodec>>,
}

impl CodecRegistry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Register a codec
    ///
    /// Later registrations take precedence for shared extensions.
    pub fn register<C: DocumentCodec + 'static>(&mut self, codec: C) {
        self.codecs.insert(0, Box::new(codec));
    }

    #[must_use]
    pub fn find_for_extension(&self, extension: &str) -> Option<&dyn DocumentCodec> {
        self.codecs
            .iter()
            .find(|c| c.extensions().contains(&extension))
            .map(|c| &**c)
    }

    #[must_use]
    pub fn find_for_path(&self, path: &str) -> Option<&dyn DocumentCodec> {
        self.codecs.iter().find(|c| c.can_handle(path)).map(|c| &**c)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.codecs
            .iter()
            .flat_map(|c| c.extensions())
            .copied()
            .collect()
    }

    fn codec_for(&self, path: &str) -> Result<&dyn DocumentCodec, CodecError> {
        self.find_for_path(path)
            .ok_or_else(|| CodecError::NoCodecForDocument(path.to_string()))
    }

    /// Encode every stored document with the codec for its path
    ///
    /// # Errors
    /// Fails on the first document with no codec or that cannot be encoded
    pub fn encode_all(&self, stored: &StoredDocuments) -> Result<EncodedDocuments, CodecError> {
        let mut files = EncodedDocuments::with_capacity(stored.len());
        for (path, document) in stored {
            let text = self
                .codec_for(path)
                .and_then(|codec| codec.encode(document))
                .map_err(|e| e.in_document(path.as_str()))?;
            tracing::trace!("Encoded document: {} ({} bytes)", path, text.len());
            files.insert(path.clone(), text);
        }
        tracing::debug!("Encoded {} documents", files.len());
        Ok(files)
    }

    /// Decode every file with the codec for its path
    ///
    /// # Errors
    /// Fails on the first file with no codec or that cannot be parsed
    pub fn decode_all(&self, files: &EncodedDocuments) -> Result<StoredDocuments, CodecError> {
        let mut stored = StoredDocuments::with_capacity(files.len());
        for (path, text) in files {
            let document = self
                .codec_for(path)
                .and_then(|codec| codec.decode(text))
                .map_err(|e| e.in_document(path.as_str()))?;
            stored.insert(path.clone(), document);
        }
        tracing::debug!("Decoded {} documents", stored.len());
        Ok(stored)
    }
}

/// Create registry with the YAML and JSON codecs
#[inline]
#[must_use]
pub fn default_codecs() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register(JsonCodec);
    registry.register(YamlCodec);
    registry
}
