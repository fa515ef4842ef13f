//! Error types for document codecs

/// Errors during document encoding or decoding
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No codec registered for a document's extension
    #[error("no codec registered for document: '{0}'")]
    NoCodecForDocument(String),

    /// Failure inside one document of a set
    #[error("document '{document}': {source}")]
    Document {
        document: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Attach the logical path of the failing document
    pub fn in_document(self, document: impl Into<String>) -> Self {
        Self::Document {
            document: document.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_context_display() {
        let err = CodecError::NoCodecForDocument("notes.txt".to_string()).in_document("notes.txt");
        assert_eq!(
            err.to_string(),
            "document 'notes.txt': no codec registered for document: 'notes.txt'"
        );
    }
}
