//! # Parsing Engine
//!
//! Turns host items into node subtrees by dispatching each item to the
//! first registered converter that accepts it.
//!
//! ## Run model
//!
//! A call to [`ParseEngine::parse`] is one run. The run builds into a copy
//! of the target tree and writes it back only when every requested item
//! converted; a failed run, or one whose future is dropped before it
//! finishes, leaves the caller's tree as it was. Converters touch the copy
//! through [`ParseContext::with_tree`], which never holds the lock across
//! an `.await`.
//!
//! Within a run:
//!
//! - each host item is converted at most once; repeated or concurrent
//!   requests share the first result
//! - children are converted concurrently and their results are combined in
//!   source order
//! - converters recurse through [`ParseContext::parse_children`] instead of
//!   walking children themselves

use crate::converters::DefaultParseConverter;
use crate::{ParseError, ParseResult};
use async_trait::async_trait;
use futures::future::{join_all, BoxFuture, FutureExt};
use parking_lot::Mutex;
use quire_common::{DispatchResult, HostDocument, HostId, Memo, Registry, RunStats, TEXT_TAG};
use quire_tree::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Boolean test over a host item.
pub type HostPredicate = Arc<dyn Fn(&HostDocument, HostId) -> bool + Send + Sync>;

/// Gate deciding which host items a converter accepts.
#[derive(Clone)]
pub enum HostMatcher {
    /// Elements with this tag (or `#text` / `#comment`).
    Tag(String),
    Predicate(HostPredicate),
}

impl HostMatcher {
    pub fn tag(tag: impl Into<String>) -> Self {
        HostMatcher::Tag(tag.into())
    }

    pub fn text() -> Self {
        HostMatcher::Tag(TEXT_TAG.to_string())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&HostDocument, HostId) -> bool + Send + Sync + 'static,
    {
        HostMatcher::Predicate(Arc::new(f))
    }

    pub fn matches(&self, host: &HostDocument, item: HostId) -> bool {
        match self {
            HostMatcher::Tag(tag) => host.tag(item) == Some(tag.as_str()),
            HostMatcher::Predicate(f) => f(host, item),
        }
    }
}

impl fmt::Debug for HostMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMatcher::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            HostMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Host → tree converter.
///
/// A converter returns the nodes an item becomes, which may be none or
/// several. Returned nodes may be left detached; the caller attaches them.
#[async_trait]
pub trait ParseConverter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Items this converter accepts. Only the default converter may return
    /// `None`.
    fn matcher(&self) -> Option<HostMatcher>;

    async fn parse(&self, cx: &ParseContext, item: HostId) -> ParseResult<Vec<NodeId>>;
}

/// Options for parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Drop text items that are entirely whitespace
    pub skip_whitespace_text: bool,
    /// Keep comments as placeholder nodes
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_whitespace_text: false,
            keep_comments: true,
        }
    }
}

type ParseRegistry = Registry<HostMatcher, dyn ParseConverter>;

struct ParseRun {
    host: Arc<HostDocument>,
    tree: Mutex<Tree>,
    registry: ParseRegistry,
    memo: Memo<HostId, ParseResult<Vec<NodeId>>>,
    options: ParseOptions,
}

/// Handle a converter uses to reach the run it is part of.
#[derive(Clone)]
pub struct ParseContext {
    run: Arc<ParseRun>,
    /// Chain position of the converter holding this context.
    index: usize,
}

impl ParseContext {
    pub fn host(&self) -> &HostDocument {
        &self.run.host
    }

    pub fn options(&self) -> &ParseOptions {
        &self.run.options
    }

    /// Position of the current converter in the chain.
    pub fn converter_index(&self) -> usize {
        self.index
    }

    /// Run `f` against the target tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(&mut self.run.tree.lock())
    }

    /// Convert `item`, sharing the result with every other request for it in
    /// this run.
    pub async fn parse(&self, item: HostId) -> ParseResult<Vec<NodeId>> {
        let run = Arc::clone(&self.run);
        self.run
            .memo
            .get_or_start(item, move || dispatch(run, 0, item))
            .await
    }

    /// Convert `item` with the next converter after the current one that
    /// accepts it. Not memoized.
    pub async fn parse_next(&self, item: HostId) -> ParseResult<Vec<NodeId>> {
        dispatch(Arc::clone(&self.run), self.index + 1, item).await
    }

    /// Convert every child of `item`, concatenating results in child order.
    pub async fn parse_children(&self, item: HostId) -> ParseResult<Vec<NodeId>> {
        let children = self.host().children(item).to_vec();
        let results = join_all(children.into_iter().map(|child| self.parse(child))).await;

        let mut nodes = Vec::new();
        for result in results {
            nodes.extend(result?);
        }
        Ok(nodes)
    }

    /// Convert the children of `item` and append them to `parent`.
    pub async fn parse_children_into(&self, parent: NodeId, item: HostId) -> ParseResult<()> {
        let nodes = self.parse_children(item).await?;
        self.with_tree(|tree| -> ParseResult<()> {
            for node in nodes {
                tree.append(parent, node)?;
            }
            Ok(())
        })
    }
}

fn dispatch(
    run: Arc<ParseRun>,
    from: usize,
    item: HostId,
) -> BoxFuture<'static, ParseResult<Vec<NodeId>>> {
    async move {
        if run.host.get(item).is_none() {
            return Err(ParseError::UnknownItem(item));
        }
        let selected = run
            .registry
            .select(from, |matcher| matcher.matches(&run.host, item))
            .ok_or(ParseError::EndOfChain { item, index: from })?;

        debug!(
            converter = selected.converter.name(),
            index = selected.index,
            %item,
            "Parsing item"
        );

        let cx = ParseContext {
            run: Arc::clone(&run),
            index: selected.index,
        };
        selected.converter.parse(&cx, item).await
    }
    .boxed()
}

/// Result of a parse run
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// Nodes produced for the requested items, in item order
    pub nodes: Vec<NodeId>,
    pub stats: RunStats,
}

/// Dispatching host → tree converter.
#[derive(Clone)]
pub struct ParseEngine {
    registry: ParseRegistry,
    options: ParseOptions,
}

impl Default for ParseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseEngine {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            registry: Registry::new(Arc::new(DefaultParseConverter)),
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Add a converter ahead of all previously registered ones.
    pub fn register<C: ParseConverter + 'static>(&mut self, converter: C) -> DispatchResult<()> {
        self.register_shared(Arc::new(converter))
    }

    pub fn register_shared(&mut self, converter: Arc<dyn ParseConverter>) -> DispatchResult<()> {
        let name = converter.name();
        self.registry.register(name, converter.matcher(), converter)?;
        debug!(converter = name, total = self.registry.len(), "Registered parse converter");
        Ok(())
    }

    /// Replace the default converter.
    pub fn set_default_converter<C: ParseConverter + 'static>(&mut self, converter: C) {
        self.registry.set_fallback(Arc::new(converter));
    }

    /// Number of converters, default included.
    pub fn converter_count(&self) -> usize {
        self.registry.len()
    }

    /// Parse every root of `host` into `tree`.
    pub async fn parse(&self, host: Arc<HostDocument>, tree: &mut Tree) -> ParseResult<ParseOutput> {
        let roots = host.roots().to_vec();
        self.parse_items(host, tree, &roots).await
    }

    /// Parse selected items of `host` into `tree`.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn parse_items(
        &self,
        host: Arc<HostDocument>,
        tree: &mut Tree,
        items: &[HostId],
    ) -> ParseResult<ParseOutput> {
        info!("Starting parse run");

        let run = Arc::new(ParseRun {
            host,
            tree: Mutex::new(tree.clone()),
            registry: self.registry.clone(),
            memo: Memo::new(),
            options: self.options.clone(),
        });
        let _reset = run.memo.clear_on_drop();
        let cx = ParseContext {
            run: Arc::clone(&run),
            index: 0,
        };

        let results = join_all(items.iter().map(|&item| cx.parse(item))).await;
        let mut nodes = Vec::new();
        for result in results {
            nodes.extend(result?);
        }
        *tree = std::mem::take(&mut *run.tree.lock());

        let stats = run.memo.stats();
        info!(
            nodes = nodes.len(),
            conversions = stats.conversions,
            memo_hits = stats.memo_hits,
            "Parse run complete"
        );
        Ok(ParseOutput { nodes, stats })
    }
}
