//! # Selection
//!
//! A [`Range`] with a direction. The anchor is where the selection gesture
//! started and stays put; the focus is the end that moves.
//!
//! | direction | anchor  | focus   |
//! |-----------|---------|---------|
//! | Forward   | `start` | `end`   |
//! | Backward  | `end`   | `start` |
//!
//! When moving one end crosses the other, the two markers trade places and
//! the direction flips, so the range keeps `start ≤ end` and the anchor
//! stays where the user left it.

use crate::range::{place_marker, swap_positions};
use crate::{Position, Range};
use quire_tree::{Matcher, NodeId, Traversal, Tree, TreeResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    range: Range,
    direction: Direction,
}

impl Selection {
    /// Collapsed selection right before `node`.
    pub fn at(tree: &mut Tree, node: NodeId) -> TreeResult<Self> {
        Ok(Self::from_range(Range::at(tree, node)?))
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            range,
            direction: Direction::Forward,
        }
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_backward(&self) -> bool {
        self.direction == Direction::Backward
    }

    pub fn anchor(&self) -> NodeId {
        match self.direction {
            Direction::Forward => self.range.start(),
            Direction::Backward => self.range.end(),
        }
    }

    pub fn focus(&self) -> NodeId {
        match self.direction {
            Direction::Forward => self.range.end(),
            Direction::Backward => self.range.start(),
        }
    }

    pub fn is_collapsed(&self, tree: &Tree) -> bool {
        self.range.is_collapsed(tree)
    }

    pub fn selected_nodes(&self, tree: &Tree, matcher: Option<&Matcher>) -> Vec<NodeId> {
        self.range.selected_nodes(tree, matcher)
    }

    pub fn set_anchor(&mut self, tree: &mut Tree, reference: NodeId, position: Position) -> TreeResult<()> {
        place_marker(tree, self.anchor(), reference, position)?;
        self.restore_order(tree)
    }

    pub fn set_focus(&mut self, tree: &mut Tree, reference: NodeId, position: Position) -> TreeResult<()> {
        place_marker(tree, self.focus(), reference, position)?;
        self.restore_order(tree)
    }

    /// Swap the markers back into order if one end crossed the other.
    fn restore_order(&mut self, tree: &mut Tree) -> TreeResult<()> {
        let (start, end) = (self.range.start(), self.range.end());
        if tree.is_after(start, end) {
            swap_positions(tree, start, end)?;
            self.direction = self.direction.flipped();
        }
        Ok(())
    }

    /// Anchor at one place, focus at another, in either order.
    pub fn select(
        &mut self,
        tree: &mut Tree,
        anchor: NodeId,
        anchor_position: Position,
        focus: NodeId,
        focus_position: Position,
    ) -> TreeResult<()> {
        // Collapse at the anchor first so no inverted state is ever visible,
        // then let the focus decide the direction.
        self.direction = Direction::Forward;
        place_marker(tree, self.range.start(), anchor, anchor_position)?;
        self.range.collapse(tree, true)?;
        self.set_focus(tree, focus, focus_position)
    }

    /// Collapse onto the anchor.
    pub fn collapse(&mut self, tree: &mut Tree) -> TreeResult<()> {
        self.range.collapse(tree, self.direction == Direction::Forward)?;
        self.direction = Direction::Forward;
        Ok(())
    }

    pub fn collapse_to_focus(&mut self, tree: &mut Tree) -> TreeResult<()> {
        self.range.collapse(tree, self.direction == Direction::Backward)?;
        self.direction = Direction::Forward;
        Ok(())
    }

    /// Move the focus so the selection reaches `node`, on the side of the
    /// anchor `node` lies on.
    pub fn extend_to(&mut self, tree: &mut Tree, node: NodeId) -> TreeResult<()> {
        let first = tree.first_leaf_in(node, Traversal::SkipMarkers);
        if tree.is_before(first, self.anchor()) {
            self.set_focus(tree, node, Position::Before)
        } else {
            self.set_focus(tree, node, Position::After)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_tree::NodeKind;

    const CHAR: NodeKind = NodeKind::atomic("char");

    fn fixture() -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let p = tree.create(NodeKind::container("paragraph"));
        let chars: Vec<NodeId> = (0..4)
            .map(|_| {
                let c = tree.create(CHAR);
                tree.append(p, c).unwrap();
                c
            })
            .collect();
        (tree, p, chars)
    }

    #[test]
    fn test_forward_selection() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[0]).unwrap();
        selection
            .select(&mut tree, c[1], Position::Before, c[2], Position::After)
            .unwrap();

        assert_eq!(selection.direction(), Direction::Forward);
        assert_eq!(selection.anchor(), selection.range().start());
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[1], c[2]]);
    }

    #[test]
    fn test_backward_selection_keeps_range_ordered() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[0]).unwrap();
        selection
            .select(&mut tree, c[2], Position::After, c[1], Position::Before)
            .unwrap();

        assert!(selection.is_backward());
        assert_eq!(selection.anchor(), selection.range().end());
        assert!(tree.is_before(selection.range().start(), selection.range().end()));
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[1], c[2]]);
    }

    #[test]
    fn test_focus_crossing_anchor_flips_direction() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[2]).unwrap();
        selection.set_focus(&mut tree, c[3], Position::After).unwrap();
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[2], c[3]]);

        // Drag the focus back past the anchor
        selection.set_focus(&mut tree, c[0], Position::Before).unwrap();
        assert!(selection.is_backward());
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[0], c[1]]);
        assert_eq!(tree.next_sibling_in(selection.anchor(), Traversal::SkipMarkers), Some(c[2]));

        // And forward again
        selection.set_focus(&mut tree, c[3], Position::Before).unwrap();
        assert_eq!(selection.direction(), Direction::Forward);
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[2]]);
    }

    #[test]
    fn test_collapse_goes_to_anchor() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[0]).unwrap();
        selection
            .select(&mut tree, c[3], Position::After, c[1], Position::Before)
            .unwrap();
        let anchor = selection.anchor();

        selection.collapse(&mut tree).unwrap();
        assert!(selection.is_collapsed(&tree));
        assert_eq!(tree.previous_sibling_in(anchor, Traversal::SkipMarkers), Some(c[3]));
        assert_eq!(tree.previous_sibling_in(selection.range().start(), Traversal::SkipMarkers), Some(c[3]));
    }

    #[test]
    fn test_collapse_to_focus() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[0]).unwrap();
        selection
            .select(&mut tree, c[0], Position::Before, c[2], Position::After)
            .unwrap();
        selection.collapse_to_focus(&mut tree).unwrap();
        assert!(selection.is_collapsed(&tree));
        assert_eq!(tree.next_sibling_in(selection.range().end(), Traversal::SkipMarkers), Some(c[3]));
    }

    #[test]
    fn test_extend_to_either_side() {
        let (mut tree, _, c) = fixture();
        let mut selection = Selection::at(&mut tree, c[2]).unwrap();
        selection.extend_to(&mut tree, c[3]).unwrap();
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[2], c[3]]);

        selection.extend_to(&mut tree, c[0]).unwrap();
        assert!(selection.is_backward());
        assert_eq!(selection.selected_nodes(&tree, None), vec![c[0], c[1]]);
    }
}
