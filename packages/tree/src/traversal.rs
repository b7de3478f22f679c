//! # Traversal
//!
//! Navigation over the tree in strict pre-order (node, then each child's
//! subtree left to right).
//!
//! Markers are skipped unless the traversal includes them. Every navigation
//! query has an `_in` form taking an explicit [`Traversal`]; the short form
//! uses the ambient mode, which defaults to skipping markers and can be
//! changed for the duration of a closure with [`with_markers_visible`].
//!
//! ```rust
//! use quire_tree::{with_markers_visible, NodeKind, Traversal, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.create(NodeKind::ROOT);
//! let marker = tree.create_marker();
//! tree.append(root, marker).unwrap();
//!
//! assert_eq!(tree.first_child(root), None);
//! assert_eq!(with_markers_visible(|| tree.first_child(root)), Some(marker));
//! assert_eq!(Traversal::ambient(), Traversal::SkipMarkers);
//! ```
//!
//! Ordering queries (`is_before`, `is_after`, `common_ancestor`) are
//! structural and see every node regardless of mode.

use crate::{NodeId, Tree};
use std::cell::Cell;
use std::cmp::Ordering;

/// Whether marker nodes are visible to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    SkipMarkers,
    IncludeMarkers,
}

thread_local! {
    static AMBIENT: Cell<Traversal> = const { Cell::new(Traversal::SkipMarkers) };
}

impl Traversal {
    /// Mode in effect for the current thread.
    pub fn ambient() -> Self {
        AMBIENT.with(Cell::get)
    }

    pub fn includes_markers(self) -> bool {
        self == Traversal::IncludeMarkers
    }
}

/// Restores the previous ambient mode on drop, including during unwinding.
struct RestoreMode(Traversal);

impl Drop for RestoreMode {
    fn drop(&mut self) {
        AMBIENT.with(|cell| cell.set(self.0));
    }
}

/// Run `f` with the ambient traversal set to `mode`. Nested calls restore the
/// enclosing mode, not the default.
pub fn with_traversal<R>(mode: Traversal, f: impl FnOnce() -> R) -> R {
    let _restore = RestoreMode(AMBIENT.with(|cell| cell.replace(mode)));
    f()
}

pub fn with_markers_visible<R>(f: impl FnOnce() -> R) -> R {
    with_traversal(Traversal::IncludeMarkers, f)
}

impl Tree {
    fn visible(&self, id: NodeId, mode: Traversal) -> bool {
        mode.includes_markers() || !self.is_marker(id)
    }

    /// Children visible under `mode`.
    pub fn child_nodes_in(&self, id: NodeId, mode: Traversal) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.visible(c, mode))
    }

    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes_in(id, Traversal::ambient())
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.child_nodes(id).count()
    }

    /// True when `id` has no children visible under the ambient mode.
    pub fn is_childless(&self, id: NodeId) -> bool {
        self.first_child(id).is_none()
    }

    pub fn first_child_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        self.child_nodes_in(id, mode).next()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.first_child_in(id, Traversal::ambient())
    }

    pub fn last_child_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| self.visible(c, mode))
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.last_child_in(id, Traversal::ambient())
    }

    /// Index in the parent's raw child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&c| self.visible(c, mode))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.next_sibling_in(id, Traversal::ambient())
    }

    pub fn previous_sibling_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.visible(c, mode))
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.previous_sibling_in(id, Traversal::ambient())
    }

    /// Pre-order successor.
    pub fn next_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        if let Some(child) = self.first_child_in(id, mode) {
            return Some(child);
        }
        self.next_skipping_children(id, mode)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.next_in(id, Traversal::ambient())
    }

    /// Pre-order successor of the whole subtree at `id`.
    pub fn next_skipping_children(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        let mut current = id;
        loop {
            if let Some(sibling) = self.next_sibling_in(current, mode) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }

    /// Pre-order predecessor.
    pub fn previous_in(&self, id: NodeId, mode: Traversal) -> Option<NodeId> {
        match self.previous_sibling_in(id, mode) {
            Some(sibling) => Some(self.last_leaf_in(sibling, mode)),
            None => self.parent(id),
        }
    }

    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.previous_in(id, Traversal::ambient())
    }

    /// Deepest first descendant, or `id` itself when it has no children.
    pub fn first_leaf_in(&self, id: NodeId, mode: Traversal) -> NodeId {
        let mut current = id;
        while let Some(child) = self.first_child_in(current, mode) {
            current = child;
        }
        current
    }

    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        self.first_leaf_in(id, Traversal::ambient())
    }

    /// Deepest last descendant, or `id` itself when it has no children.
    pub fn last_leaf_in(&self, id: NodeId, mode: Traversal) -> NodeId {
        let mut current = id;
        while let Some(child) = self.last_child_in(current, mode) {
            current = child;
        }
        current
    }

    pub fn last_leaf(&self, id: NodeId) -> NodeId {
        self.last_leaf_in(id, Traversal::ambient())
    }

    /// Parent chain, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Subtree of `id` in pre-order, excluding `id`.
    pub fn descendants_in(&self, id: NodeId, mode: Traversal) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child_in(id, mode),
            mode,
        }
    }

    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.descendants_in(id, Traversal::ambient())
    }

    /// Childless descendants of `id` (or `id` itself when childless).
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mode = Traversal::ambient();
        if self.first_child_in(id, mode).is_none() {
            return vec![id];
        }
        self.descendants_in(id, mode)
            .filter(|&d| self.first_child_in(d, mode).is_none())
            .collect()
    }

    /// Top of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Strict ancestry: a node is not its own ancestor.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Lowest node that is `a` or an ancestor of `a` and also `b` or an
    /// ancestor of `b`. `None` when the nodes are in different trees.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain: Vec<NodeId> = std::iter::once(a).chain(self.ancestors(a)).collect();
        std::iter::once(b)
            .chain(self.ancestors(b))
            .find(|candidate| chain.contains(candidate))
    }

    fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = std::iter::once(id).chain(self.ancestors(id)).collect();
        path.reverse();
        path
    }

    /// Pre-order comparison. `None` when the nodes are in different trees.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        if path_a.first() != path_b.first() {
            return None;
        }

        let shared = path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .count();

        match (path_a.get(shared), path_b.get(shared)) {
            // `a` is an ancestor of `b`
            (None, Some(_)) => Some(Ordering::Less),
            (Some(_), None) => Some(Ordering::Greater),
            (Some(&x), Some(&y)) => {
                let ix = self.index_in_parent(x)?;
                let iy = self.index_in_parent(y)?;
                Some(ix.cmp(&iy))
            }
            (None, None) => Some(Ordering::Equal),
        }
    }

    /// True when `a` comes strictly before `b` in pre-order. An ancestor is
    /// before all of its descendants.
    pub fn is_before(&self, a: NodeId, b: NodeId) -> bool {
        self.compare(a, b) == Some(Ordering::Less)
    }

    pub fn is_after(&self, a: NodeId, b: NodeId) -> bool {
        self.compare(a, b) == Some(Ordering::Greater)
    }
}

pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeId>,
    mode: Traversal,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.successor_within_root(current);
        Some(current)
    }
}

impl Descendants<'_> {
    fn successor_within_root(&self, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self.tree.first_child_in(id, self.mode) {
            return Some(child);
        }
        let mut current = id;
        while current != self.root {
            if let Some(sibling) = self.tree.next_sibling_in(current, self.mode) {
                return Some(sibling);
            }
            current = self.tree.parent(current)?;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;

    const PARA: NodeKind = NodeKind::container("paragraph");
    const CHAR: NodeKind = NodeKind::atomic("char");

    /// root → [p1 → [a, m, b], p2 → [c]]
    struct Fixture {
        tree: Tree,
        root: NodeId,
        p1: NodeId,
        p2: NodeId,
        a: NodeId,
        m: NodeId,
        b: NodeId,
        c: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = Tree::new();
        let root = tree.create(NodeKind::ROOT);
        let p1 = tree.create(PARA);
        let p2 = tree.create(PARA);
        let a = tree.create(CHAR);
        let m = tree.create_marker();
        let b = tree.create(CHAR);
        let c = tree.create(CHAR);
        tree.append(root, p1).unwrap();
        tree.append(root, p2).unwrap();
        for id in [a, m, b] {
            tree.append(p1, id).unwrap();
        }
        tree.append(p2, c).unwrap();
        Fixture { tree, root, p1, p2, a, m, b, c }
    }

    #[test]
    fn test_pre_order_next_skips_markers() {
        let f = fixture();
        let order: Vec<NodeId> = std::iter::successors(Some(f.root), |&n| f.tree.next(n)).collect();
        assert_eq!(order, vec![f.root, f.p1, f.a, f.b, f.p2, f.c]);
    }

    #[test]
    fn test_pre_order_next_with_markers() {
        let f = fixture();
        let order: Vec<NodeId> = with_markers_visible(|| {
            std::iter::successors(Some(f.root), |&n| f.tree.next(n)).collect()
        });
        assert_eq!(order, vec![f.root, f.p1, f.a, f.m, f.b, f.p2, f.c]);
    }

    #[test]
    fn test_previous_is_inverse_of_next() {
        let f = fixture();
        let mut current = f.c;
        let mut backwards = vec![current];
        while let Some(prev) = f.tree.previous(current) {
            backwards.push(prev);
            current = prev;
        }
        assert_eq!(backwards, vec![f.c, f.p2, f.b, f.a, f.p1, f.root]);
    }

    #[test]
    fn test_siblings_skip_markers() {
        let f = fixture();
        assert_eq!(f.tree.next_sibling(f.a), Some(f.b));
        assert_eq!(f.tree.previous_sibling(f.b), Some(f.a));
        assert_eq!(
            f.tree.next_sibling_in(f.a, Traversal::IncludeMarkers),
            Some(f.m)
        );
        assert_eq!(f.tree.next_sibling(f.b), None);
    }

    #[test]
    fn test_leaves() {
        let f = fixture();
        assert_eq!(f.tree.first_leaf(f.root), f.a);
        assert_eq!(f.tree.last_leaf(f.root), f.c);
        assert_eq!(f.tree.leaves(f.root), vec![f.a, f.b, f.c]);
        assert_eq!(f.tree.first_leaf(f.a), f.a);
    }

    #[test]
    fn test_descendants_stay_within_subtree() {
        let f = fixture();
        let under_p1: Vec<NodeId> = f.tree.descendants(f.p1).collect();
        assert_eq!(under_p1, vec![f.a, f.b]);
        let all: Vec<NodeId> = f.tree.descendants(f.root).collect();
        assert_eq!(all, vec![f.p1, f.a, f.b, f.p2, f.c]);
    }

    #[test]
    fn test_ancestors_and_common_ancestor() {
        let f = fixture();
        let chain: Vec<NodeId> = f.tree.ancestors(f.a).collect();
        assert_eq!(chain, vec![f.p1, f.root]);
        assert_eq!(f.tree.common_ancestor(f.a, f.b), Some(f.p1));
        assert_eq!(f.tree.common_ancestor(f.a, f.c), Some(f.root));
        assert_eq!(f.tree.common_ancestor(f.p1, f.b), Some(f.p1));
        assert_eq!(f.tree.depth(f.a), 2);
        assert_eq!(f.tree.root_of(f.c), f.root);
    }

    #[test]
    fn test_is_before_ancestor_first() {
        let f = fixture();
        assert!(f.tree.is_before(f.p1, f.a));
        assert!(f.tree.is_after(f.a, f.p1));
        assert!(f.tree.is_before(f.b, f.p2));
        assert!(f.tree.is_before(f.a, f.m));
        assert!(!f.tree.is_before(f.a, f.a));
        assert!(!f.tree.is_after(f.a, f.a));
    }

    #[test]
    fn test_detached_nodes_are_unordered() {
        let mut f = fixture();
        let loose = f.tree.create(CHAR);
        assert!(!f.tree.is_before(loose, f.a));
        assert!(!f.tree.is_after(loose, f.a));
        assert_eq!(f.tree.common_ancestor(loose, f.a), None);
    }

    #[test]
    fn test_nested_scope_restores_previous_mode() {
        assert_eq!(Traversal::ambient(), Traversal::SkipMarkers);
        with_markers_visible(|| {
            with_traversal(Traversal::SkipMarkers, || {
                assert_eq!(Traversal::ambient(), Traversal::SkipMarkers);
            });
            assert_eq!(Traversal::ambient(), Traversal::IncludeMarkers);
        });
        assert_eq!(Traversal::ambient(), Traversal::SkipMarkers);
    }

    #[test]
    fn test_scope_restored_after_panic() {
        let result = std::panic::catch_unwind(|| {
            with_markers_visible(|| panic!("boom"));
        });
        assert!(result.is_err());
        assert_eq!(Traversal::ambient(), Traversal::SkipMarkers);
    }

    #[test]
    fn test_childless_ignores_markers() {
        let mut tree = Tree::new();
        let p = tree.create(PARA);
        let m = tree.create_marker();
        tree.append(p, m).unwrap();
        assert!(tree.is_childless(p));
        assert_eq!(tree.child_count(p), 0);
        assert!(!with_markers_visible(|| tree.is_childless(p)));
    }
}
