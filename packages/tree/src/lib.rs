//! # Quire Tree
//!
//! The abstract document tree: an arena of nodes with ordered children,
//! parent back-references by id, pre-order traversal and structural
//! mutation (insert, remove, split, merge).
//!
//! Range boundaries are ordinary [`NodeKind::MARKER`] nodes living inside
//! the tree; navigation skips them unless asked not to (see
//! [`Traversal`]).

mod error;
mod matcher;
mod node;
mod snapshot;
mod traversal;
mod tree;

pub use error::{TreeError, TreeResult};
pub use matcher::{Matcher, NodePredicate};
pub use node::{
    Attributes, NodeData, NodeId, NodeKind, PLACEHOLDER_TAG_ATTR, PLACEHOLDER_TEXT_ATTR,
};
pub use snapshot::TreeSnapshot;
pub use traversal::{with_markers_visible, with_traversal, Ancestors, Descendants, Traversal};
pub use tree::Tree;
