//! JSON document codec

use cfgtree_node::ConfigNode;

use crate::error::CodecError;
use crate::DocumentCodec;

/// Pretty-printed JSON codec (serde_json)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn encode(&self, document: &ConfigNode) -> Result<String, CodecError> {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        Ok(text)
    }

    fn decode(&self, text: &str) -> Result<ConfigNode, CodecError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(ConfigNode::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_keeps_order() {
        let doc = ConfigNode::map([("b", ConfigNode::from(1.5)), ("a", ConfigNode::list([true]))]);
        let text = JsonCodec.encode(&doc).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(JsonCodec.decode(&text).unwrap(), doc);
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(matches!(JsonCodec.decode("{"), Err(CodecError::Json(_))));
    }
}
