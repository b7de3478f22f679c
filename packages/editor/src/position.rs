use quire_tree::NodeId;
use serde::{Deserialize, Serialize};

/// Side of a reference node a boundary is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
}

/// Where a range marker sits, described by its visible neighbours.
///
/// `Inside` is reported when the marker has no visible siblings, i.e. its
/// parent is otherwise empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "position", content = "node", rename_all = "lowercase")]
pub enum Boundary {
    Before(NodeId),
    After(NodeId),
    Inside(NodeId),
}

impl Boundary {
    pub fn node(&self) -> NodeId {
        match *self {
            Boundary::Before(id) | Boundary::After(id) | Boundary::Inside(id) => id,
        }
    }
}
