use crate::{Attributes, NodeId, Tree};
use serde::{Deserialize, Serialize};

/// Nested, serializable view of a subtree for inspection tooling.
///
/// Markers are included so tools can show where ranges sit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub id: NodeId,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl Tree {
    pub fn dump(&self, id: NodeId) -> Option<TreeSnapshot> {
        let node = self.node(id)?;
        Some(TreeSnapshot {
            id,
            kind: node.kind().name().to_string(),
            attributes: node.attributes().clone(),
            children: node
                .children()
                .iter()
                .filter_map(|&child| self.dump(child))
                .collect(),
        })
    }
}

impl TreeSnapshot {
    /// Count of nodes in the snapshot, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeSnapshot::size).sum::<usize>()
    }
}
