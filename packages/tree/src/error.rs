use crate::NodeId;
use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Structural invariant violations.
///
/// Every mutation validates its arguments before touching the tree, so a
/// returned error means nothing was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Node {0} is atomic and cannot have children")]
    AtomicNode(NodeId),

    #[error("Inserting {node} into {parent} would create a cycle")]
    WouldCreateCycle { node: NodeId, parent: NodeId },

    #[error("Node {0} has no parent")]
    Detached(NodeId),

    #[error("Marker {0} cannot carry attributes")]
    MarkerAttributes(NodeId),

    #[error("Markers cannot be created with attributes")]
    AttributedMarker,
}

impl TreeError {
    pub fn not_a_child(parent: NodeId, child: NodeId) -> Self {
        Self::NotAChild { parent, child }
    }

    pub fn would_create_cycle(node: NodeId, parent: NodeId) -> Self {
        Self::WouldCreateCycle { node, parent }
    }
}
