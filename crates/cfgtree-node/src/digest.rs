//! Content digests of configuration trees
//!
//! Provides [`NodeDigest`], a 32-byte Blake3 hash over an order-sensitive
//! encoding of a [`ConfigNode`]. Equal trees (including map order) always
//! produce equal digests.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::node::{ConfigNode, Scalar};

/// A 32-byte tree digest (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeDigest([u8; 32]);

impl NodeDigest {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create digest from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DigestError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| DigestError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Digest a configuration tree
    #[must_use]
    pub fn compute(node: &ConfigNode) -> Self {
        let mut hasher = blake3::Hasher::new();
        feed(&mut hasher, node);
        Self(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

// Tag byte + length-prefixed payload per node, so distinct trees never
// share an encoding.
fn feed(hasher: &mut blake3::Hasher, node: &ConfigNode) {
    match node {
        ConfigNode::Scalar(Scalar::Null) => {
            hasher.update(b"n");
        }
        ConfigNode::Scalar(Scalar::Bool(b)) => {
            hasher.update(if *b { b"t" } else { b"f" });
        }
        ConfigNode::Scalar(Scalar::Number(n)) => {
            hasher.update(b"#");
            feed_str(hasher, &n.to_string());
        }
        ConfigNode::Scalar(Scalar::String(s)) => {
            hasher.update(b"s");
            feed_str(hasher, s);
        }
        ConfigNode::List(items) => {
            hasher.update(b"[");
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                feed(hasher, item);
            }
        }
        ConfigNode::Map(map) => {
            hasher.update(b"{");
            hasher.update(&(map.len() as u64).to_le_bytes());
            for (key, value) in map {
                feed_str(hasher, key);
                feed(hasher, value);
            }
        }
    }
}

fn feed_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl Display for NodeDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for NodeDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl From<&ConfigNode> for NodeDigest {
    fn from(node: &ConfigNode) -> Self {
        Self::compute(node)
    }
}

/// Errors related to digests
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DigestError {
    /// Invalid byte length
    #[error("invalid digest length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Invalid hex encoding
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let tree = ConfigNode::map([("a", ConfigNode::from(1)), ("b", ConfigNode::from("x"))]);
        assert_eq!(NodeDigest::compute(&tree), NodeDigest::compute(&tree.clone()));
    }

    #[test]
    fn digest_is_order_sensitive() {
        let ab = ConfigNode::map([("a", 1), ("b", 2)]);
        let ba = ConfigNode::map([("b", 2), ("a", 1)]);
        assert_ne!(NodeDigest::compute(&ab), NodeDigest::compute(&ba));
    }

    #[test]
    fn digest_distinguishes_kinds() {
        let text = ConfigNode::from("1");
        let number = ConfigNode::from(1);
        let nested = ConfigNode::list([ConfigNode::list([ConfigNode::null()])]);
        let flat = ConfigNode::list([ConfigNode::null()]);
        assert_ne!(NodeDigest::compute(&text), NodeDigest::compute(&number));
        assert_ne!(NodeDigest::compute(&nested), NodeDigest::compute(&flat));
    }

    #[test]
    fn digest_hex_roundtrip() {
        let digest = NodeDigest::compute(&ConfigNode::from(true));
        let parsed: NodeDigest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
        assert_eq!(digest.short().len(), 16);
    }

    #[test]
    fn digest_invalid_length() {
        let result = NodeDigest::from_slice(&[0u8; 16]);
        assert!(matches!(
            result,
            Err(DigestError::InvalidLength { expected: 32, actual: 16 })
        ));
        assert!("zz".parse::<NodeDigest>().is_err());
    }
}
