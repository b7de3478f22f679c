//! # Nodes
//!
//! Node identity, node kinds and the per-node record stored in the arena.
//!
//! A node kind is a `(name, atomic)` pair. Kinds are plain values so plugins
//! can declare their own as constants:
//!
//! ```rust
//! use quire_tree::NodeKind;
//!
//! const PARAGRAPH: NodeKind = NodeKind::container("paragraph");
//! const CHAR: NodeKind = NodeKind::atomic("char");
//!
//! assert!(!PARAGRAPH.is_atomic());
//! assert!(CHAR.is_atomic());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered name → value pairs carried for converters to read.
pub type Attributes = IndexMap<String, String>;

/// Attribute holding the host tag of a [`NodeKind::PLACEHOLDER`] node.
pub const PLACEHOLDER_TAG_ATTR: &str = "quire:tag";

/// Attribute holding the content of a placeholder made from a text or
/// comment item.
pub const PLACEHOLDER_TEXT_ATTR: &str = "quire:text";

/// Stable node identity.
///
/// Ids are handed out in increasing order by the owning [`Tree`](crate::Tree)
/// and are never reassigned, including after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKind {
    name: &'static str,
    atomic: bool,
}

impl NodeKind {
    /// Document root.
    pub const ROOT: NodeKind = NodeKind::container("root");

    /// Zero-width position marker used by ranges.
    pub const MARKER: NodeKind = NodeKind::atomic("marker");

    /// Generic node produced when no parse converter recognizes an item.
    /// The item's tag is kept in [`PLACEHOLDER_TAG_ATTR`].
    pub const PLACEHOLDER: NodeKind = NodeKind::container("placeholder");

    /// Kind that may hold children.
    pub const fn container(name: &'static str) -> Self {
        Self { name, atomic: false }
    }

    /// Kind that never holds children.
    pub const fn atomic(name: &'static str) -> Self {
        Self { name, atomic: true }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_atomic(&self) -> bool {
        self.atomic
    }

    pub fn is_marker(&self) -> bool {
        *self == Self::MARKER
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Arena record for a single node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: Attributes,
}

impl NodeData {
    pub(crate) fn new(id: NodeId, kind: NodeKind, attributes: Attributes) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: Vec::new(),
            attributes,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Raw child list, markers included.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn is_marker(&self) -> bool {
        self.kind.is_marker()
    }
}
