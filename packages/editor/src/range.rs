//! # Range
//!
//! A range is a pair of marker nodes living in the tree itself. Content
//! edits move nodes around the markers, so a range follows the content it
//! delimits without any offset bookkeeping.
//!
//! ```text
//! paragraph ─┬─ a
//!            ├─ [start]
//!            ├─ b          ← selected
//!            ├─ [end]
//!            └─ c
//! ```
//!
//! ## Boundary placement
//!
//! A boundary set relative to a reference node resolves to the deepest
//! first (`Before`) or last (`After`) leaf of that node, markers ignored:
//!
//! - atomic leaf: the marker becomes its sibling on the requested side
//! - empty container: the marker goes inside it, first for `Before` and
//!   last for `After`
//!
//! `start` never ends up after `end`. Moving one boundary past the other
//! drags the other along so the range collapses at the new position.

use crate::{Boundary, Position};
use quire_tree::{Matcher, NodeId, Traversal, Tree, TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Interval over the pre-order sequence, delimited by two markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    start: NodeId,
    end: NodeId,
}

impl Range {
    /// Collapsed range right before `node`.
    pub fn at(tree: &mut Tree, node: NodeId) -> TreeResult<Self> {
        Self::at_position(tree, node, Position::Before)
    }

    /// Collapsed range on the given side of `node`.
    pub fn at_position(tree: &mut Tree, node: NodeId, position: Position) -> TreeResult<Self> {
        let range = Self::detached(tree);
        place_marker(tree, range.start, node, position)?;
        tree.insert_after_node(range.end, range.start)?;
        Ok(range)
    }

    /// Range from before `first` to after `last`.
    pub fn selecting(tree: &mut Tree, first: NodeId, last: NodeId) -> TreeResult<Self> {
        let mut range = Self::at(tree, first)?;
        range.set_end(tree, last, Position::After)?;
        Ok(range)
    }

    /// Two fresh markers, not yet in the tree.
    fn detached(tree: &mut Tree) -> Self {
        Self {
            start: tree.create_marker(),
            end: tree.create_marker(),
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn set_start(&mut self, tree: &mut Tree, reference: NodeId, position: Position) -> TreeResult<()> {
        place_marker(tree, self.start, reference, position)?;
        if tree.is_after(self.start, self.end) {
            tree.insert_after_node(self.end, self.start)?;
        }
        Ok(())
    }

    pub fn set_end(&mut self, tree: &mut Tree, reference: NodeId, position: Position) -> TreeResult<()> {
        place_marker(tree, self.end, reference, position)?;
        if tree.is_before(self.end, self.start) {
            tree.insert_before_node(self.start, self.end)?;
        }
        Ok(())
    }

    /// True when `end` directly follows `start`, markers included.
    pub fn is_collapsed(&self, tree: &Tree) -> bool {
        tree.next_sibling_in(self.start, Traversal::IncludeMarkers) == Some(self.end)
    }

    /// Move one marker onto the other.
    pub fn collapse(&mut self, tree: &mut Tree, to_start: bool) -> TreeResult<()> {
        if to_start {
            tree.insert_after_node(self.end, self.start)
        } else {
            tree.insert_before_node(self.start, self.end)
        }
    }

    /// Take both markers out of the tree. Markers that are already out
    /// are left alone.
    pub fn detach(&self, tree: &mut Tree) -> TreeResult<()> {
        for marker in [self.start, self.end] {
            if tree.parent(marker).is_some() {
                tree.remove(marker)?;
            }
        }
        Ok(())
    }

    pub fn is_attached(&self, tree: &Tree) -> bool {
        tree.parent(self.start).is_some() && tree.parent(self.end).is_some()
    }

    /// Nodes strictly between the markers, in pre-order, filtered by
    /// `matcher`. Containers that hold `end` are only partially covered and
    /// are left out. Markers are included when the ambient traversal
    /// includes them.
    pub fn selected_nodes(&self, tree: &Tree, matcher: Option<&Matcher>) -> Vec<NodeId> {
        self.selected_nodes_in(tree, matcher, Traversal::ambient())
    }

    pub fn selected_nodes_in(
        &self,
        tree: &Tree,
        matcher: Option<&Matcher>,
        mode: Traversal,
    ) -> Vec<NodeId> {
        let mut selected = Vec::new();
        let mut current = tree.next_in(self.start, Traversal::IncludeMarkers);
        while let Some(node) = current {
            if node == self.end {
                break;
            }
            let visible = mode.includes_markers() || !tree.is_marker(node);
            if visible
                && !tree.is_ancestor_of(node, self.end)
                && matcher.map_or(true, |m| m.matches(tree, node))
            {
                selected.push(node);
            }
            current = tree.next_in(node, Traversal::IncludeMarkers);
        }
        selected
    }

    /// Selected nodes whose parent is not selected as well.
    pub fn top_level_nodes(&self, tree: &Tree) -> Vec<NodeId> {
        let selected = self.selected_nodes_in(tree, None, Traversal::SkipMarkers);
        let set: HashSet<NodeId> = selected.iter().copied().collect();
        selected
            .into_iter()
            .filter(|&node| tree.parent(node).map_or(true, |p| !set.contains(&p)))
            .collect()
    }

    /// Whether `node` lies wholly inside the range.
    pub fn contains(&self, tree: &Tree, node: NodeId) -> bool {
        tree.is_after(node, self.start)
            && tree.is_before(node, self.end)
            && !tree.is_ancestor_of(node, self.end)
    }

    /// Grow the range until it covers `node`. Never shrinks.
    pub fn extend_to(&mut self, tree: &mut Tree, node: NodeId) -> TreeResult<()> {
        let first = tree.first_leaf_in(node, Traversal::SkipMarkers);
        let last = tree.last_leaf_in(node, Traversal::SkipMarkers);
        if tree.is_after(self.start, first) {
            self.set_start(tree, node, Position::Before)?;
        }
        if tree.is_before(self.end, last) {
            self.set_end(tree, node, Position::After)?;
        }
        Ok(())
    }

    /// Cover everything inside `node`.
    pub fn select_contents(&mut self, tree: &mut Tree, node: NodeId) -> TreeResult<()> {
        self.set_start(tree, node, Position::Before)?;
        self.set_end(tree, node, Position::After)
    }

    pub fn common_ancestor(&self, tree: &Tree) -> Option<NodeId> {
        tree.common_ancestor(self.start, self.end)
    }

    /// Where `start` sits, preferring the node that follows it.
    pub fn start_boundary(&self, tree: &Tree) -> Option<Boundary> {
        boundary_of(tree, self.start, Position::Before)
    }

    /// Where `end` sits, preferring the node that precedes it.
    pub fn end_boundary(&self, tree: &Tree) -> Option<Boundary> {
        boundary_of(tree, self.end, Position::After)
    }
}

/// Put `marker` on the `position` side of `reference`'s deepest leaf.
pub(crate) fn place_marker(
    tree: &mut Tree,
    marker: NodeId,
    reference: NodeId,
    position: Position,
) -> TreeResult<()> {
    if reference == marker {
        return Ok(());
    }
    if !tree.contains(reference) {
        return Err(TreeError::NodeNotFound(reference));
    }

    let leaf = match position {
        Position::Before => tree.first_leaf_in(reference, Traversal::SkipMarkers),
        Position::After => tree.last_leaf_in(reference, Traversal::SkipMarkers),
    };
    if leaf == marker {
        return Ok(());
    }

    match (tree.is_atomic(leaf), position) {
        (false, Position::Before) => tree.prepend(leaf, marker),
        (false, Position::After) => tree.append(leaf, marker),
        (true, Position::Before) => tree.insert_before_node(marker, leaf),
        (true, Position::After) => tree.insert_after_node(marker, leaf),
    }
}

/// Exchange the positions of two attached nodes.
pub(crate) fn swap_positions(tree: &mut Tree, a: NodeId, b: NodeId) -> TreeResult<()> {
    let a_parent = tree.parent(a).ok_or(TreeError::Detached(a))?;
    let a_next = tree.next_sibling_in(a, Traversal::IncludeMarkers);
    if a_next == Some(b) {
        return tree.insert_after_node(a, b);
    }
    tree.insert_before_node(a, b)?;
    match a_next {
        Some(next) => tree.insert_before_node(b, next),
        None => tree.append(a_parent, b),
    }
}

fn boundary_of(tree: &Tree, marker: NodeId, prefer: Position) -> Option<Boundary> {
    let parent = tree.parent(marker)?;
    let next = tree.next_sibling_in(marker, Traversal::SkipMarkers);
    let previous = tree.previous_sibling_in(marker, Traversal::SkipMarkers);
    let boundary = match prefer {
        Position::Before => next
            .map(Boundary::Before)
            .or(previous.map(Boundary::After)),
        Position::After => previous
            .map(Boundary::After)
            .or(next.map(Boundary::Before)),
    };
    Some(boundary.unwrap_or(Boundary::Inside(parent)))
}
