//! # Document
//!
//! A root node, the tree it lives in, and the live selection. Every change
//! to content or selection goes through [`Document::apply`], which bumps
//! the version on success.
//!
//! ## Lifecycle
//!
//! ```text
//! HostDocument → ParseEngine → Document → apply(Edit)* → RenderEngine → HostNode
//! ```

use crate::edits::{break_block, delete_selection, insert_nodes};
use crate::{Edit, EditorError, EditorResult, Position, Selection};
use quire_common::HostDocument;
use quire_parser::ParseEngine;
use quire_renderer::{RenderEngine, RenderOutput};
use quire_tree::{Matcher, NodeId, NodeKind, Tree, TreeError, TreeSnapshot};
use std::sync::Arc;
use tracing::{debug, info};

/// Options for a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Kind created when a block break happens directly under the root
    pub block_kind: NodeKind,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            block_kind: NodeKind::container("paragraph"),
        }
    }
}

/// Editable document
#[derive(Debug, Clone)]
pub struct Document {
    /// Shared with render runs; edits work on a copy and swap it in.
    tree: Arc<Tree>,
    root: NodeId,
    selection: Selection,
    /// Current version number (increments on each applied edit)
    version: u64,
    options: DocumentOptions,
}

impl Document {
    /// Empty document with the cursor inside the root.
    pub fn empty(options: DocumentOptions) -> EditorResult<Self> {
        let mut tree = Tree::new();
        let root = tree.create(NodeKind::ROOT);
        Self::from_tree(tree, root, options)
    }

    /// Wrap an existing tree. The cursor starts before the first leaf of
    /// `root`.
    pub fn from_tree(mut tree: Tree, root: NodeId, options: DocumentOptions) -> EditorResult<Self> {
        if !tree.contains(root) {
            return Err(TreeError::NodeNotFound(root).into());
        }
        let selection = Selection::at(&mut tree, root)?;
        Ok(Self {
            tree: Arc::new(tree),
            root,
            selection,
            version: 0,
            options,
        })
    }

    /// Parse `host` and put the result under a fresh root.
    pub async fn from_host(
        engine: &ParseEngine,
        host: Arc<HostDocument>,
        options: DocumentOptions,
    ) -> EditorResult<Self> {
        let mut tree = Tree::new();
        let root = tree.create(NodeKind::ROOT);
        let output = engine.parse(host, &mut tree).await?;
        for node in &output.nodes {
            tree.append(root, *node)?;
        }
        info!(
            top_level = output.nodes.len(),
            nodes = tree.len(),
            "Loaded document from host"
        );
        Self::from_tree(tree, root, options)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Shared handle to the current tree, as handed to render runs.
    pub fn snapshot(&self) -> Arc<Tree> {
        Arc::clone(&self.tree)
    }

    /// Direct tree access, e.g. to create nodes for [`Edit::Insert`].
    /// Does not count as an edit.
    pub fn tree_mut(&mut self) -> &mut Tree {
        Arc::make_mut(&mut self.tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn selected_nodes(&self, matcher: Option<&Matcher>) -> Vec<NodeId> {
        self.selection.selected_nodes(&self.tree, matcher)
    }

    pub fn dump(&self) -> Option<TreeSnapshot> {
        self.tree.dump(self.root)
    }

    /// Apply an edit. On error the document is left exactly as it was.
    ///
    /// The edit runs on a copy of the arena, so each call costs one pass
    /// over the nodes it holds. Deleted content is destroyed rather than
    /// detached, which keeps that count at the live document plus any
    /// detached nodes the caller created and has not inserted yet.
    pub fn apply(&mut self, edit: Edit) -> EditorResult<u64> {
        let mut tree = Tree::clone(&self.tree);
        let mut selection = self.selection;

        match &edit {
            Edit::Insert { nodes } => insert_nodes(&mut tree, &mut selection, nodes)?,
            Edit::DeleteSelection => delete_selection(&mut tree, &mut selection)?,
            Edit::BreakBlock => break_block(&mut tree, self.root, &mut selection, self.options.block_kind)?,
            Edit::Select {
                anchor,
                anchor_position,
                focus,
                focus_position,
            } => {
                self.check_in_document(&tree, *anchor)?;
                self.check_in_document(&tree, *focus)?;
                selection.select(&mut tree, *anchor, *anchor_position, *focus, *focus_position)?;
            }
        }

        self.tree = Arc::new(tree);
        self.selection = selection;
        self.version += 1;
        debug!(op = edit.name(), version = self.version, "Applied edit");
        Ok(self.version)
    }

    /// Selection references must be content nodes under the root.
    fn check_in_document(&self, tree: &Tree, node: NodeId) -> EditorResult<()> {
        if !tree.contains(node) || tree.root_of(node) != self.root {
            return Err(EditorError::NotInDocument(node));
        }
        if tree.is_marker(node) {
            return Err(EditorError::MarkerNode(node));
        }
        Ok(())
    }

    pub fn insert(&mut self, nodes: Vec<NodeId>) -> EditorResult<u64> {
        self.apply(Edit::Insert { nodes })
    }

    pub fn delete_selection(&mut self) -> EditorResult<u64> {
        self.apply(Edit::DeleteSelection)
    }

    pub fn break_block(&mut self) -> EditorResult<u64> {
        self.apply(Edit::BreakBlock)
    }

    pub fn select(
        &mut self,
        anchor: NodeId,
        anchor_position: Position,
        focus: NodeId,
        focus_position: Position,
    ) -> EditorResult<u64> {
        self.apply(Edit::Select {
            anchor,
            anchor_position,
            focus,
            focus_position,
        })
    }

    /// Render the root's contents.
    pub async fn render(&self, engine: &RenderEngine) -> EditorResult<RenderOutput> {
        Ok(engine.render_contents(self.snapshot(), self.root).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARA: NodeKind = NodeKind::container("paragraph");
    const CHAR: NodeKind = NodeKind::atomic("char");

    #[test]
    fn test_new_document_has_cursor_in_root() {
        let doc = Document::empty(DocumentOptions::default()).unwrap();
        assert_eq!(doc.version(), 0);
        assert!(doc.selection().is_collapsed(doc.tree()));
        assert_eq!(doc.tree().parent(doc.selection().anchor()), Some(doc.root()));
        assert!(doc.tree().is_childless(doc.root()));
    }

    #[test]
    fn test_version_increments_only_on_success() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let result = doc.select(NodeId(99), Position::Before, NodeId(99), Position::After);
        assert_eq!(result, Err(EditorError::NotInDocument(NodeId(99))));
        assert_eq!(doc.version(), 0);

        assert_eq!(doc.break_block(), Ok(1));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_failed_edit_leaves_document_untouched() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let p = doc.tree_mut().create(PARA);
        let c = doc.tree_mut().create(CHAR);
        doc.tree_mut().append(p, c).unwrap();
        let root = doc.root();
        doc.tree_mut().append(root, p).unwrap();

        // `c` moves before the root is found to be an ancestor of the cursor
        let before = doc.dump();
        let anchor = doc.selection().anchor();
        let result = doc.insert(vec![c, root]);
        assert!(matches!(result, Err(EditorError::Tree(_))));
        assert_eq!(doc.dump(), before);
        assert_eq!(doc.selection().anchor(), anchor);
    }

    #[test]
    fn test_select_rejects_foreign_nodes() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let stray = doc.tree_mut().create(CHAR);
        assert_eq!(
            doc.select(stray, Position::Before, stray, Position::After),
            Err(EditorError::NotInDocument(stray))
        );
    }

    #[test]
    fn test_markers_are_not_content() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let c = doc.tree_mut().create(CHAR);
        let end = doc.selection().range().end();

        assert_eq!(doc.insert(vec![c, end]), Err(EditorError::MarkerNode(end)));
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.tree().parent(c), None);
        assert!(doc.selection().is_collapsed(doc.tree()));
        assert!(doc.tree().is_before(doc.selection().range().start(), end));
    }

    #[test]
    fn test_select_rejects_marker_references() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let start = doc.selection().range().start();
        let end = doc.selection().range().end();
        assert_eq!(
            doc.select(start, Position::Before, end, Position::After),
            Err(EditorError::MarkerNode(start))
        );
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_arena_stays_bounded_across_edits() {
        let mut doc = Document::empty(DocumentOptions::default()).unwrap();
        let baseline = doc.tree().len();

        for _ in 0..50 {
            let c = doc.tree_mut().create(CHAR);
            doc.insert(vec![c]).unwrap();
            assert_eq!(doc.tree().len(), baseline + 1);

            doc.select(c, Position::Before, c, Position::After).unwrap();
            doc.delete_selection().unwrap();
            assert_eq!(doc.tree().len(), baseline);
            assert!(!doc.tree().contains(c));
        }
        assert_eq!(doc.version(), 150);
    }
}
