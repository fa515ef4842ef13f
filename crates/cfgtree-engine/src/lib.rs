//! cfgtree Engine
//!
//! Turns arbitrarily nested configuration state into deterministic,
//! version-control-friendly documents, and back.
//!
//! # Core Operations
//!
//! - **Canonicalize**: prune empty containers, coerce foreign objects, sort keys
//! - **Pack / Unpack**: encode ordered maps as marker-tagged pair lists
//! - **Split / Merge**: move identifier-keyed groups into per-entity documents
//!
//! # Architecture
//!
//! ```text
//! raw → canonicalize → split → pack → serializer → files
//! files → deserializer → unpack → merge → canonical tree
//! ```
//!
//! # Example
//!
//! ```rust
//! use cfgtree_engine::{Engine, EngineConfig};
//! use cfgtree_node::ConfigNode;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let raw = ConfigNode::map([("system", ConfigNode::map([("name", "site")]))]);
//!
//! let stored = engine.store(&raw).unwrap();
//! assert!(stored.contains_key("project.yaml"));
//! assert_eq!(engine.load(&stored).unwrap(), engine.canonicalize(&raw));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod assoc;
pub mod canonical;
pub mod config;
pub mod decompose;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod identifier;

// Re-exports for convenience
pub use assoc::{pack, pack_strict, unpack};
pub use canonical::{canonicalize, is_canonical};
pub use config::{
    EngineConfig, ReservedTokens, DEFAULT_ASSOC_MARKER, DEFAULT_EXTENSION, DEFAULT_METADATA_KEY,
    DEFAULT_ROOT_FILE,
};
pub use decompose::{merge, split, DocumentPath, DocumentSet};
pub use engine::{Engine, StoredDocuments};
pub use error::{
    ConfigError, EngineError, EngineResult, MergeError, PackError, SplitError, UnpackError,
};
pub use flatten::{diff, flatten, Change};
pub use identifier::is_identifier;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::config::EngineConfig;
    pub use crate::decompose::{DocumentPath, DocumentSet};
    pub use crate::engine::{Engine, StoredDocuments};
    pub use crate::error::{EngineError, EngineResult};
    pub use cfgtree_node::{ConfigMap, ConfigNode, Scalar, ToOrderedMap};
}
