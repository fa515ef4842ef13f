//! Error types for the cfgtree engine
//!
//! Provides error handling for:
//! - Engine configuration
//! - Associative packing (reserved-key collisions)
//! - Associative unpacking (malformed marker input)
//! - Decomposition and reassembly of documents

use cfgtree_node::NodePath;

/// Invalid engine configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("associative marker must not be empty")]
    EmptyAssocMarker,

    #[error("metadata key must not be empty")]
    EmptyMetadataKey,

    /// Extension is empty or contains a path separator or dot
    #[error("invalid document extension: '{0}'")]
    InvalidExtension(String),

    /// Root file contains a separator or does not carry the extension
    #[error("invalid root file '{root_file}' for extension '{extension}'")]
    InvalidRootFile { root_file: String, extension: String },
}

/// Errors during associative packing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// A literal configuration key equals the associative marker
    #[error("reserved key '{marker}' used as a configuration key at {path}")]
    ReservedKeyCollision { path: NodePath, marker: String },
}

/// Errors during associative unpacking
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnpackError {
    /// Marker value is not a list of pairs
    #[error("packed map at {path} holds a {found} instead of a pair list")]
    MarkerNotList { path: NodePath, found: &'static str },

    /// Pair list element is not a two-element list
    #[error("element {index} of packed map at {path} is not a [key, value] pair (found {found})")]
    MalformedPair {
        path: NodePath,
        index: usize,
        found: String,
    },

    /// Pair key is not a string-like scalar
    #[error("element {index} of packed map at {path} has a {found} key")]
    InvalidPairKey {
        path: NodePath,
        index: usize,
        found: &'static str,
    },

    /// Same key appears twice in one pair list
    #[error("duplicate key '{key}' in packed map at {path}")]
    DuplicateKey { path: NodePath, key: String },
}

/// Errors during decomposition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// Only map-rooted trees can be decomposed
    #[error("cannot split a tree whose root is a {found}")]
    RootNotMap { found: &'static str },
}

/// Errors during reassembly of documents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("document set has no primary document")]
    MissingPrimary,

    /// Logical path matches neither the root file nor `<group>/<id>.<ext>`
    #[error("invalid logical path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("primary document root is a {found}, expected a map")]
    RootNotMap { found: &'static str },

    /// Primary document holds the group key as a non-map value
    #[error("group '{group}' in primary document is a {found}, cannot attach entities")]
    GroupConflict { group: String, found: &'static str },

    /// Entity present both in the primary document and in a satellite
    #[error("entity '{id}' of group '{group}' is defined twice")]
    DuplicateEntity { group: String, id: String },
}

impl MergeError {
    /// Create invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

/// Combined engine error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pack error in '{document}': {source}")]
    Pack {
        document: String,
        #[source]
        source: PackError,
    },

    #[error("unpack error in '{document}': {source}")]
    Unpack {
        document: String,
        #[source]
        source: UnpackError,
    },

    #[error("split error: {0}")]
    Split(#[from] SplitError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
