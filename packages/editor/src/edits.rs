//! # Structural Edits
//!
//! Edits are expressed through the selection: content goes in at the
//! cursor, deletion removes what the selection covers, and a block break
//! splits the containers around the cursor.
//!
//! The functions here work on a bare tree and selection and stop at the
//! first failing step. [`Document::apply`](crate::Document::apply) runs
//! them against a copy, so a document never shows a half-applied edit.

use crate::{Position, Selection};
use quire_tree::{NodeId, NodeKind, Traversal, Tree, TreeError};
use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult};

/// An edit as it is recorded and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Edit {
    /// Insert existing detached nodes at the cursor, replacing the
    /// selection if there is one.
    Insert { nodes: Vec<NodeId> },

    /// Remove the selected content and join what is left around it.
    DeleteSelection,

    /// Split the block at the cursor in two.
    BreakBlock,

    #[serde(rename_all = "camelCase")]
    Select {
        anchor: NodeId,
        anchor_position: Position,
        focus: NodeId,
        focus_position: Position,
    },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Edit::Insert { .. } => "insert",
            Edit::DeleteSelection => "deleteSelection",
            Edit::BreakBlock => "breakBlock",
            Edit::Select { .. } => "select",
        }
    }
}

/// Insert `nodes` in order right before the cursor.
///
/// Markers belong to ranges and are never content; any marker in `nodes`
/// fails the edit before anything moves.
pub fn insert_nodes(tree: &mut Tree, selection: &mut Selection, nodes: &[NodeId]) -> EditorResult<()> {
    if let Some(&marker) = nodes.iter().find(|&&node| tree.is_marker(node)) {
        return Err(EditorError::MarkerNode(marker));
    }
    if !selection.is_collapsed(tree) {
        delete_selection(tree, selection)?;
    }
    let cursor = selection.range().start();
    for &node in nodes {
        tree.insert_before_node(node, cursor)?;
    }
    Ok(())
}

/// Remove the selected nodes, join the containers of the two boundaries,
/// and collapse. Removed nodes are destroyed, not kept around detached.
///
/// A selection whose boundaries sit in different containers with nothing
/// between them still joins those containers.
pub fn delete_selection(tree: &mut Tree, selection: &mut Selection) -> EditorResult<()> {
    let range = *selection.range();
    if !range.is_collapsed(tree) {
        for node in range.top_level_nodes(tree) {
            tree.destroy(node)?;
        }
        join_boundaries(tree, range.start(), range.end())?;
    }
    selection.collapse(tree)?;
    Ok(())
}

/// Bring `end`'s container up against `start`.
fn join_boundaries(tree: &mut Tree, start: NodeId, end: NodeId) -> EditorResult<()> {
    let start_parent = tree.parent(start).ok_or(TreeError::Detached(start))?;
    let end_parent = tree.parent(end).ok_or(TreeError::Detached(end))?;
    if start_parent == end_parent || tree.is_ancestor_of(end_parent, start) {
        return Ok(());
    }

    if tree.next_sibling_in(start, Traversal::IncludeMarkers).is_none() {
        tree.merge_with(end_parent, start_parent)?;
        tree.destroy(end_parent)?;
        return Ok(());
    }

    // `start` still has followers (the containers leading to `end`), so the
    // moved children go right after it instead of at the end.
    let mut cursor = start;
    for child in tree.children(end_parent).to_vec() {
        tree.insert_after_node(child, cursor)?;
        cursor = child;
    }
    tree.destroy(end_parent)?;
    Ok(())
}

/// Split every container between the cursor and `root`, so the cursor
/// starts a new block. At root level a fresh empty `block_kind` node is
/// inserted before the cursor instead.
pub fn break_block(
    tree: &mut Tree,
    root: NodeId,
    selection: &mut Selection,
    block_kind: NodeKind,
) -> EditorResult<()> {
    if !selection.is_collapsed(tree) {
        delete_selection(tree, selection)?;
    }
    let cursor = selection.range().start();
    let mut node = tree.parent(cursor).ok_or(TreeError::Detached(cursor))?;

    if node == root {
        let block = tree.create(block_kind);
        tree.insert_before_node(block, cursor)?;
        return Ok(());
    }

    let mut child = cursor;
    loop {
        let duplicate = tree.split_at(node, child)?;
        let parent = tree.parent(node).ok_or(TreeError::Detached(node))?;
        if parent == root {
            return Ok(());
        }
        child = duplicate;
        node = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_json_shape() {
        let edit = Edit::Select {
            anchor: NodeId(3),
            anchor_position: Position::Before,
            focus: NodeId(5),
            focus_position: Position::After,
        };
        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "select",
                "anchor": 3,
                "anchorPosition": "before",
                "focus": 5,
                "focusPosition": "after"
            })
        );

        let parsed: Edit = serde_json::from_str(r#"{ "op": "deleteSelection" }"#).unwrap();
        assert_eq!(parsed, Edit::DeleteSelection);
        assert_eq!(parsed.name(), "deleteSelection");
    }
}
