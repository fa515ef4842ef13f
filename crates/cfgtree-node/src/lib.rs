//! cfgtree Node Model
//!
//! Ordered configuration trees shared by every cfgtree transform.
//!
//! # Core Concepts
//!
//! - [`ConfigNode`]: Tagged union of scalars, ordered lists and ordered maps
//! - [`ToOrderedMap`]: Capability for decoded values to present themselves as trees
//! - [`NodePath`]: Hierarchical addressing of nodes
//! - [`NodeDigest`]: 32-byte Blake3 digest of a tree
//!
//! # Example
//!
//! ```rust
//! use cfgtree_node::{ConfigNode, NodeDigest};
//!
//! let tree = ConfigNode::map([("name", "site"), ("lang", "en")]);
//! assert_eq!(tree.get("lang").and_then(ConfigNode::as_str), Some("en"));
//!
//! let digest = NodeDigest::compute(&tree);
//! assert_eq!(digest.short().len(), 16);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod convert;
mod digest;
mod node;
mod path;

pub use convert::{Entries, Items, Shape, ToOrderedMap};
pub use digest::{DigestError, NodeDigest};
pub use node::{ConfigMap, ConfigNode, Scalar};
pub use path::{NodePath, PathError, Segment};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
