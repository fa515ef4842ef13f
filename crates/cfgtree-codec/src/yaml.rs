//! YAML document codec
//!
//! Decoding is structural: tags are dropped and non-string keys are
//! stringified, but nothing is pruned or sorted, so packed documents come
//! back exactly as written.

use cfgtree_node::ConfigNode;

use crate::error::CodecError;
use crate::DocumentCodec;

/// YAML codec (serde_yaml)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn encode(&self, document: &ConfigNode) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(document)?)
    }

    fn decode(&self, text: &str) -> Result<ConfigNode, CodecError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Ok(ConfigNode::from(value))
    }
}
