//! Engine configuration
//!
//! Reserved tokens and logical path conventions are threaded through every
//! transform via [`EngineConfig`] rather than read from globals.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default associative marker key
pub const DEFAULT_ASSOC_MARKER: &str = "__assoc__";

/// Default top-level metadata key (always kept in the primary document)
pub const DEFAULT_METADATA_KEY: &str = "dateModified";

/// Default file extension of produced documents
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Default logical path of the primary document
pub const DEFAULT_ROOT_FILE: &str = "project.yaml";

/// Keys with engine-defined meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedTokens {
    /// Sole key of a packed associative map
    pub assoc_marker: String,
    /// Top-level key that is never split out of the primary document
    pub metadata_key: String,
}

impl Default for ReservedTokens {
    fn default() -> Self {
        Self {
            assoc_marker: DEFAULT_ASSOC_MARKER.to_string(),
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reserved tokens
    pub reserved: ReservedTokens,
    /// Logical path of the primary document
    pub root_file: String,
    /// Extension appended to satellite documents (without dot)
    pub extension: String,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With associative marker
    #[inline]
    #[must_use]
    pub fn with_assoc_marker(mut self, marker: impl Into<String>) -> Self {
        self.reserved.assoc_marker = marker.into();
        self
    }

    /// With metadata key
    #[inline]
    #[must_use]
    pub fn with_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.reserved.metadata_key = key.into();
        self
    }

    /// With primary document path
    #[inline]
    #[must_use]
    pub fn with_root_file(mut self, root_file: impl Into<String>) -> Self {
        self.root_file = root_file.into();
        self
    }

    /// With document extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Associative marker key
    #[inline]
    #[must_use]
    pub fn assoc_marker(&self) -> &str {
        &self.reserved.assoc_marker
    }

    /// Metadata key
    #[inline]
    #[must_use]
    pub fn metadata_key(&self) -> &str {
        &self.reserved.metadata_key
    }

    /// Check that the configuration yields unambiguous documents
    ///
    /// # Errors
    /// Returns the first violated rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reserved.assoc_marker.is_empty() {
            return Err(ConfigError::EmptyAssocMarker);
        }
        if self.reserved.metadata_key.is_empty() {
            return Err(ConfigError::EmptyMetadataKey);
        }
        if self.extension.is_empty() || self.extension.contains(|c| c == '/' || c == '.') {
            return Err(ConfigError::InvalidExtension(self.extension.clone()));
        }
        let suffix = format!(".{}", self.extension);
        if self.root_file.contains('/')
            || !self.root_file.ends_with(&suffix)
            || self.root_file == suffix
        {
            return Err(ConfigError::InvalidRootFile {
                root_file: self.root_file.clone(),
                extension: self.extension.clone(),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reserved: ReservedTokens::default(),
            root_file: DEFAULT_ROOT_FILE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}
