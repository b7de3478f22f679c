//! # Rendering Engine
//!
//! Turns node subtrees into host nodes by dispatching each node to the first
//! registered converter whose [`Matcher`] accepts it.
//!
//! The tree is shared read-only for the whole run, so converters can look
//! at neighbours and ancestors freely. Each node is rendered at most once
//! per run; children render concurrently and come back in tree order.
//!
//! Decorating converters build on the chain instead of replacing it:
//!
//! ```rust,ignore
//! async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
//!     let inner = cx.render_next(node).await?;
//!     Ok(vec![HostNode::element("strong").with_children(inner)])
//! }
//! ```

use crate::converters::DefaultRenderConverter;
use crate::{RenderError, RenderOptions, RenderResult};
use async_trait::async_trait;
use futures::future::{join_all, BoxFuture, FutureExt};
use quire_common::{DispatchResult, HostNode, Memo, Registry, RunStats};
use quire_tree::{Matcher, NodeId, Traversal, Tree};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Tree → host converter.
#[async_trait]
pub trait RenderConverter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Nodes this converter accepts. Only the default converter may return
    /// `None`.
    fn matcher(&self) -> Option<Matcher>;

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>>;
}

type RenderRegistry = Registry<Matcher, dyn RenderConverter>;

struct RenderRun {
    tree: Arc<Tree>,
    registry: RenderRegistry,
    memo: Memo<NodeId, RenderResult<Vec<HostNode>>>,
    options: RenderOptions,
}

/// Handle a converter uses to reach the run it is part of.
#[derive(Clone)]
pub struct RenderContext {
    run: Arc<RenderRun>,
    index: usize,
}

impl RenderContext {
    pub fn tree(&self) -> &Tree {
        &self.run.tree
    }

    pub fn options(&self) -> &RenderOptions {
        &self.run.options
    }

    pub fn converter_index(&self) -> usize {
        self.index
    }

    /// Render `node`, sharing the result with every other request for it in
    /// this run.
    pub async fn render(&self, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let run = Arc::clone(&self.run);
        self.run
            .memo
            .get_or_start(node, move || dispatch(run, 0, node))
            .await
    }

    /// Render `node` with the next converter after the current one that
    /// accepts it. Not memoized.
    pub async fn render_next(&self, node: NodeId) -> RenderResult<Vec<HostNode>> {
        dispatch(Arc::clone(&self.run), self.index + 1, node).await
    }

    /// Render the children of `node` in order. Markers are skipped.
    pub async fn render_children(&self, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let children: Vec<NodeId> = self
            .tree()
            .child_nodes_in(node, Traversal::SkipMarkers)
            .collect();
        let results = join_all(children.into_iter().map(|child| self.render(child))).await;

        let mut nodes = Vec::new();
        for result in results {
            nodes.extend(result?);
        }
        Ok(nodes)
    }
}

fn dispatch(
    run: Arc<RenderRun>,
    from: usize,
    node: NodeId,
) -> BoxFuture<'static, RenderResult<Vec<HostNode>>> {
    async move {
        if !run.tree.contains(node) {
            return Err(RenderError::UnknownNode(node));
        }
        let selected = run
            .registry
            .select(from, |matcher| matcher.matches(&run.tree, node))
            .ok_or(RenderError::EndOfChain { node, index: from })?;

        debug!(
            converter = selected.converter.name(),
            index = selected.index,
            %node,
            "Rendering node"
        );

        let cx = RenderContext {
            run: Arc::clone(&run),
            index: selected.index,
        };
        selected.converter.render(&cx, node).await
    }
    .boxed()
}

/// Result of a render run
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub nodes: Vec<HostNode>,
    pub stats: RunStats,
}

/// Dispatching tree → host converter.
#[derive(Clone)]
pub struct RenderEngine {
    registry: RenderRegistry,
    options: RenderOptions,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            registry: Registry::new(Arc::new(DefaultRenderConverter)),
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Add a converter ahead of all previously registered ones.
    pub fn register<C: RenderConverter + 'static>(&mut self, converter: C) -> DispatchResult<()> {
        self.register_shared(Arc::new(converter))
    }

    pub fn register_shared(&mut self, converter: Arc<dyn RenderConverter>) -> DispatchResult<()> {
        let name = converter.name();
        self.registry.register(name, converter.matcher(), converter)?;
        debug!(converter = name, total = self.registry.len(), "Registered render converter");
        Ok(())
    }

    pub fn set_default_converter<C: RenderConverter + 'static>(&mut self, converter: C) {
        self.registry.set_fallback(Arc::new(converter));
    }

    /// Number of converters, default included.
    pub fn converter_count(&self) -> usize {
        self.registry.len()
    }

    /// Render the subtree rooted at `node`.
    pub async fn render(&self, tree: Arc<Tree>, node: NodeId) -> RenderResult<RenderOutput> {
        self.render_nodes(tree, &[node]).await
    }

    /// Render the visible children of `node`, leaving `node` itself out.
    /// This is how a document renders its root.
    pub async fn render_contents(&self, tree: Arc<Tree>, node: NodeId) -> RenderResult<RenderOutput> {
        if !tree.contains(node) {
            return Err(RenderError::UnknownNode(node));
        }
        let children: Vec<NodeId> = tree.child_nodes_in(node, Traversal::SkipMarkers).collect();
        self.render_nodes(tree, &children).await
    }

    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub async fn render_nodes(&self, tree: Arc<Tree>, nodes: &[NodeId]) -> RenderResult<RenderOutput> {
        info!("Starting render run");

        let run = Arc::new(RenderRun {
            tree,
            registry: self.registry.clone(),
            memo: Memo::new(),
            options: self.options.clone(),
        });
        let _reset = run.memo.clear_on_drop();
        let cx = RenderContext {
            run: Arc::clone(&run),
            index: 0,
        };

        let results = join_all(nodes.iter().map(|&node| cx.render(node))).await;
        let mut output = Vec::new();
        for result in results {
            output.extend(result?);
        }

        let stats = run.memo.stats();
        info!(
            host_nodes = output.len(),
            conversions = stats.conversions,
            memo_hits = stats.memo_hits,
            "Render run complete"
        );
        Ok(RenderOutput {
            nodes: output,
            stats,
        })
    }
}
