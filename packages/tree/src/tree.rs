//! # Node Tree
//!
//! Arena of nodes addressed by [`NodeId`]. Parent → child edges are owned
//! child lists; child → parent edges are plain ids, so no reference cycles
//! exist.
//!
//! ## Mutation contract
//!
//! - A node lives in at most one child list. Inserting a node that already
//!   has a parent detaches it first.
//! - Reference nodes passed to `insert_before`/`insert_after`/`remove_child`
//!   must be children of the given parent, otherwise `NotAChild`.
//! - Atomic nodes never receive children (`AtomicNode`).
//! - All checks run before anything moves; an `Err` leaves the tree as it was.
//!
//! ## Storage
//!
//! Ids are handed out from a counter and never reused. Detached nodes stay
//! in the arena so they can be inserted again; [`Tree::destroy`] drops a
//! subtree for good, after which its ids report `NodeNotFound`. The arena
//! therefore holds the live nodes plus whatever detached nodes the caller
//! keeps around, and cloning a tree costs that many nodes.

use crate::{Attributes, NodeData, NodeId, NodeKind, TreeError, TreeResult};
use indexmap::IndexMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: IndexMap<NodeId, NodeData>,
    next_id: u64,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node with no attributes.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind, Attributes::new())
    }

    /// Create a detached node with attributes.
    ///
    /// Markers cannot carry attributes; passing any for one fails with
    /// `AttributedMarker` and creates nothing.
    pub fn create_with(&mut self, kind: NodeKind, attributes: Attributes) -> TreeResult<NodeId> {
        if kind.is_marker() && !attributes.is_empty() {
            return Err(TreeError::AttributedMarker);
        }
        Ok(self.alloc(kind, attributes))
    }

    pub fn create_marker(&mut self) -> NodeId {
        self.create(NodeKind::MARKER)
    }

    fn alloc(&mut self, kind: NodeKind, attributes: Attributes) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, NodeData::new(id, kind, attributes));
        id
    }

    /// Number of nodes held by the arena, attached or not. Destroyed nodes
    /// are not counted.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    pub(crate) fn data(&self, id: NodeId) -> TreeResult<&NodeData> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut NodeData> {
        self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Raw child list, markers included. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is(&self, id: NodeId, kind: NodeKind) -> bool {
        self.kind(id) == Some(kind)
    }

    pub fn test(&self, id: NodeId, matcher: &crate::Matcher) -> bool {
        matcher.matches(self, id)
    }

    pub fn is_marker(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(NodeData::is_marker)
    }

    pub fn is_atomic(&self, id: NodeId) -> bool {
        self.kind(id).is_some_and(|k| k.is_atomic())
    }

    // Attributes

    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.node(id).map(|n| &n.attributes)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> TreeResult<()> {
        let node = self.data_mut(id)?;
        if node.is_marker() {
            return Err(TreeError::MarkerAttributes(id));
        }
        node.attributes.insert(name.into(), value.into());
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> TreeResult<Option<String>> {
        Ok(self.data_mut(id)?.attributes.shift_remove(name))
    }

    // Validation helpers

    /// Check that `node` may become a child of `parent`.
    fn check_adopt(&self, parent: NodeId, node: NodeId) -> TreeResult<()> {
        let p = self.data(parent)?;
        self.data(node)?;
        if p.kind.is_atomic() {
            return Err(TreeError::AtomicNode(parent));
        }
        if node == parent || self.is_ancestor_of(node, parent) {
            return Err(TreeError::would_create_cycle(node, parent));
        }
        Ok(())
    }

    fn check_child(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.data(parent)?;
        if self.data(child)?.parent != Some(parent) {
            return Err(TreeError::not_a_child(parent, child));
        }
        Ok(())
    }

    /// Unlink `id` from its parent, if any. Never fails for known ids.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.nodes[&parent].children;
        if let Some(pos) = siblings.iter().position(|&c| c == id) {
            siblings.remove(pos);
        }
        self.nodes[&id].parent = None;
    }

    /// Link a detached node into `parent` at `index`.
    fn attach(&mut self, parent: NodeId, index: usize, id: NodeId) {
        let children = &mut self.nodes[&parent].children;
        let index = index.min(children.len());
        children.insert(index, id);
        self.nodes[&id].parent = Some(parent);
    }

    fn position_in(&self, parent: NodeId, child: NodeId) -> usize {
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .unwrap_or(0)
    }

    // Mutation

    pub fn append(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check_adopt(parent, child)?;
        self.detach(child);
        let end = self.nodes[&parent].children.len();
        self.attach(parent, end, child);
        Ok(())
    }

    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check_adopt(parent, child)?;
        self.detach(child);
        self.attach(parent, 0, child);
        Ok(())
    }

    /// Insert `node` into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: NodeId,
    ) -> TreeResult<()> {
        self.check_child(parent, reference)?;
        self.check_adopt(parent, node)?;
        if node == reference {
            return Ok(());
        }
        self.detach(node);
        let index = self.position_in(parent, reference);
        self.attach(parent, index, node);
        Ok(())
    }

    /// Insert `node` into `parent` immediately after `reference`.
    pub fn insert_after(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: NodeId,
    ) -> TreeResult<()> {
        self.check_child(parent, reference)?;
        self.check_adopt(parent, node)?;
        if node == reference {
            return Ok(());
        }
        self.detach(node);
        let index = self.position_in(parent, reference) + 1;
        self.attach(parent, index, node);
        Ok(())
    }

    /// Insert `node` as the sibling just before `reference`.
    pub fn insert_before_node(&mut self, node: NodeId, reference: NodeId) -> TreeResult<()> {
        let parent = self.parent(reference).ok_or(TreeError::Detached(reference))?;
        self.insert_before(parent, node, reference)
    }

    /// Insert `node` as the sibling just after `reference`.
    pub fn insert_after_node(&mut self, node: NodeId, reference: NodeId) -> TreeResult<()> {
        let parent = self.parent(reference).ok_or(TreeError::Detached(reference))?;
        self.insert_after(parent, node, reference)
    }

    /// Detach `id` from its parent. Detached nodes stay in the arena and
    /// can be inserted again. Fails with `Detached` when `id` has no parent.
    pub fn remove(&mut self, id: NodeId) -> TreeResult<()> {
        if self.data(id)?.parent.is_none() {
            return Err(TreeError::Detached(id));
        }
        self.detach(id);
        Ok(())
    }

    /// Detach `id` if needed and drop it and all of its descendants from
    /// the arena. Returns the number of nodes dropped.
    pub fn destroy(&mut self, id: NodeId) -> TreeResult<usize> {
        self.data(id)?;
        self.detach(id);

        let mut pending = vec![id];
        let mut dropped = 0;
        while let Some(next) = pending.pop() {
            if let Some(data) = self.nodes.swap_remove(&next) {
                pending.extend(data.children);
                dropped += 1;
            }
        }
        trace!(%id, dropped, "Destroyed subtree");
        Ok(dropped)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check_child(parent, child)?;
        self.detach(child);
        Ok(())
    }

    /// Split `node` before `child`.
    ///
    /// A shallow copy of `node` (same kind and attributes, no children) is
    /// inserted right after `node`, and `child` with all of its following
    /// siblings moves into it. Returns the copy.
    pub fn split_at(&mut self, node: NodeId, child: NodeId) -> TreeResult<NodeId> {
        self.check_child(node, child)?;
        let parent = self.parent(node).ok_or(TreeError::Detached(node))?;

        let (kind, attributes) = {
            let data = self.data(node)?;
            (data.kind, data.attributes.clone())
        };
        let duplicate = self.alloc(kind, attributes);

        let index = self.position_in(node, child);
        let moved = self.nodes[&node].children.split_off(index);
        for &id in &moved {
            self.nodes[&id].parent = Some(duplicate);
        }
        self.nodes[&duplicate].children = moved;

        let after = self.position_in(parent, node) + 1;
        self.attach(parent, after, duplicate);

        trace!(%node, %child, %duplicate, "Split node");
        Ok(duplicate)
    }

    /// Move every child of `node` to the end of `target`, then detach `node`.
    /// Merging a node into itself does nothing.
    pub fn merge_with(&mut self, node: NodeId, target: NodeId) -> TreeResult<()> {
        if node == target {
            self.data(node)?;
            return Ok(());
        }
        let has_children = !self.data(node)?.children.is_empty();
        if has_children && self.data(target)?.kind.is_atomic() {
            return Err(TreeError::AtomicNode(target));
        }
        self.data(target)?;
        if self.is_ancestor_of(node, target) {
            return Err(TreeError::would_create_cycle(node, target));
        }

        let moved = std::mem::take(&mut self.nodes[&node].children);
        for &id in &moved {
            self.nodes[&id].parent = Some(target);
        }
        self.nodes[&target].children.extend(moved);
        self.detach(node);

        trace!(%node, %target, "Merged node");
        Ok(())
    }

    /// Copy the subtree rooted at `id` with fresh ids. Markers are not
    /// copied since each belongs to exactly one range.
    pub fn deep_clone(&mut self, id: NodeId) -> TreeResult<NodeId> {
        let (kind, attributes, children) = {
            let data = self.data(id)?;
            (data.kind, data.attributes.clone(), data.children.clone())
        };
        let copy = self.alloc(kind, attributes);
        for child in children {
            if self.is_marker(child) {
                continue;
            }
            let child_copy = self.deep_clone(child)?;
            self.attach(copy, usize::MAX, child_copy);
        }
        Ok(copy)
    }
}
