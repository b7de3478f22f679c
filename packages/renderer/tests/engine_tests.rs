//! Rendering engine dispatch tests

use async_trait::async_trait;
use quire_common::{to_html, DispatchError, HostNode, HtmlOptions};
use quire_renderer::{
    RenderContext, RenderConverter, RenderEngine, RenderError, RenderOptions, RenderResult,
};
use quire_tree::{Matcher, NodeId, NodeKind, Tree, PLACEHOLDER_TAG_ATTR, PLACEHOLDER_TEXT_ATTR};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PARA: NodeKind = NodeKind::container("paragraph");
const CHAR: NodeKind = NodeKind::atomic("char");

struct ParagraphRenderer;

#[async_trait]
impl RenderConverter for ParagraphRenderer {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn matcher(&self) -> Option<Matcher> {
        Some(PARA.into())
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let children = cx.render_children(node).await?;
        Ok(vec![HostNode::element("p").with_children(children)])
    }
}

struct CharRenderer {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderConverter for CharRenderer {
    fn name(&self) -> &'static str {
        "char"
    }

    fn matcher(&self) -> Option<Matcher> {
        Some(CHAR.into())
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = cx.tree().attr(node, "value").unwrap_or_default().to_string();
        // Later nodes finish first
        for _ in 0..16usize.saturating_sub(node.0 as usize) {
            tokio::task::yield_now().await;
        }
        Ok(vec![HostNode::text(value)])
    }
}

/// Wraps chars carrying `bold` around whatever the rest of the chain makes.
struct BoldDecoration;

#[async_trait]
impl RenderConverter for BoldDecoration {
    fn name(&self) -> &'static str {
        "bold"
    }

    fn matcher(&self) -> Option<Matcher> {
        Some(Matcher::predicate(|tree, id| {
            tree.is(id, CHAR) && tree.attr(id, "bold").is_some()
        }))
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let inner = cx.render_next(node).await?;
        Ok(vec![HostNode::element("strong").with_children(inner)])
    }
}

struct Named(&'static str);

#[async_trait]
impl RenderConverter for Named {
    fn name(&self) -> &'static str {
        self.0
    }

    fn matcher(&self) -> Option<Matcher> {
        Some(PARA.into())
    }

    async fn render(&self, _cx: &RenderContext, _node: NodeId) -> RenderResult<Vec<HostNode>> {
        Ok(vec![HostNode::element(self.0)])
    }
}

struct Unconditional;

#[async_trait]
impl RenderConverter for Unconditional {
    fn name(&self) -> &'static str {
        "unconditional"
    }

    fn matcher(&self) -> Option<Matcher> {
        None
    }

    async fn render(&self, _cx: &RenderContext, _node: NodeId) -> RenderResult<Vec<HostNode>> {
        Ok(vec![])
    }
}

/// Renders its first child twice.
struct Echo;

#[async_trait]
impl RenderConverter for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn matcher(&self) -> Option<Matcher> {
        Some(NodeKind::container("echo").into())
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let child = cx.tree().children(node)[0];
        let (a, b) = futures::join!(cx.render(child), cx.render(child));
        let mut out = a?;
        out.extend(b?);
        Ok(out)
    }
}

/// Asks for the converter after the default.
struct PastTheEnd;

#[async_trait]
impl RenderConverter for PastTheEnd {
    fn name(&self) -> &'static str {
        "past-the-end"
    }

    fn matcher(&self) -> Option<Matcher> {
        None
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        cx.render_next(node).await
    }
}

fn char_node(tree: &mut Tree, value: &str) -> NodeId {
    let id = tree.create(CHAR);
    tree.set_attr(id, "value", value).unwrap();
    id
}

fn document(text: &str) -> (Tree, NodeId, NodeId) {
    let mut tree = Tree::new();
    let root = tree.create(NodeKind::ROOT);
    let p = tree.create(PARA);
    tree.append(root, p).unwrap();
    for ch in text.chars() {
        let c = char_node(&mut tree, &ch.to_string());
        tree.append(p, c).unwrap();
    }
    (tree, root, p)
}

fn engine(calls: &Arc<AtomicUsize>) -> RenderEngine {
    let mut engine = RenderEngine::new();
    engine.register(ParagraphRenderer).unwrap();
    engine
        .register(CharRenderer {
            calls: Arc::clone(calls),
        })
        .unwrap();
    engine
}

#[tokio::test]
async fn test_empty_container_gets_line_break() {
    let mut tree = Tree::new();
    let root = tree.create(NodeKind::ROOT);
    let p = tree.create(PARA);
    tree.append(root, p).unwrap();
    // A marker alone does not make the paragraph visible
    let marker = tree.create_marker();
    tree.append(p, marker).unwrap();

    let output = RenderEngine::new()
        .render_contents(Arc::new(tree), root)
        .await
        .unwrap();

    assert_eq!(
        output.nodes,
        vec![HostNode::element("div")
            .with_attr("data-kind", "paragraph")
            .with_child(HostNode::element("br"))]
    );
}

#[tokio::test]
async fn test_atomic_nodes_get_no_line_break() {
    let mut tree = Tree::new();
    let c = char_node(&mut tree, "x");
    let output = RenderEngine::new().render(Arc::new(tree), c).await.unwrap();
    assert_eq!(
        output.nodes,
        vec![HostNode::element("div")
            .with_attr("data-kind", "char")
            .with_attr("value", "x")]
    );
}

#[tokio::test]
async fn test_placeholders_rebuild_host_items() {
    let mut tree = Tree::new();
    let section = tree.create(NodeKind::PLACEHOLDER);
    tree.set_attr(section, PLACEHOLDER_TAG_ATTR, "section").unwrap();
    tree.set_attr(section, "id", "intro").unwrap();
    let text = tree.create(NodeKind::PLACEHOLDER);
    tree.set_attr(text, PLACEHOLDER_TAG_ATTR, "#text").unwrap();
    tree.set_attr(text, PLACEHOLDER_TEXT_ATTR, "hi").unwrap();
    let img = tree.create(NodeKind::PLACEHOLDER);
    tree.set_attr(img, PLACEHOLDER_TAG_ATTR, "img").unwrap();
    tree.append(section, text).unwrap();
    tree.append(section, img).unwrap();

    let output = RenderEngine::new()
        .render(Arc::new(tree), section)
        .await
        .unwrap();
    assert_eq!(
        to_html(&output.nodes, &HtmlOptions::default()),
        r#"<section id="intro">hi<img></section>"#
    );
}

#[tokio::test]
async fn test_children_render_in_tree_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (tree, root, _) = document("abc");
    let output = engine(&calls)
        .render_contents(Arc::new(tree), root)
        .await
        .unwrap();

    assert_eq!(
        to_html(&output.nodes, &HtmlOptions::default()),
        "<p>abc</p>"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_render_next_layers_decorations() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut tree, root, p) = document("ab");
    let b = tree.children(p)[1];
    tree.set_attr(b, "bold", "").unwrap();

    let mut engine = engine(&calls);
    engine.register(BoldDecoration).unwrap();
    let output = engine.render_contents(Arc::new(tree), root).await.unwrap();

    assert_eq!(
        to_html(&output.nodes, &HtmlOptions::default()),
        "<p>a<strong>b</strong></p>"
    );
}

#[tokio::test]
async fn test_most_recent_registration_wins() {
    let (tree, root, _) = document("");
    let mut engine = RenderEngine::new();
    engine.register(Named("first")).unwrap();
    engine.register(Named("second")).unwrap();
    assert_eq!(engine.converter_count(), 3);

    let output = engine.render_contents(Arc::new(tree), root).await.unwrap();
    assert_eq!(output.nodes, vec![HostNode::element("second")]);
}

#[tokio::test]
async fn test_unconditional_converter_rejected() {
    let mut engine = RenderEngine::new();
    assert_eq!(
        engine.register(Unconditional),
        Err(DispatchError::MissingPredicate("unconditional".to_string()))
    );
    assert_eq!(engine.converter_count(), 1);
}

#[tokio::test]
async fn test_each_node_rendered_once_per_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut tree = Tree::new();
    let echo = tree.create(NodeKind::container("echo"));
    let c = char_node(&mut tree, "x");
    tree.append(echo, c).unwrap();

    let mut engine = engine(&calls);
    engine.register(Echo).unwrap();
    let output = engine.render(Arc::new(tree), echo).await.unwrap();

    assert_eq!(output.nodes, vec![HostNode::text("x"), HostNode::text("x")]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.stats.conversions, 2);
    assert_eq!(output.stats.memo_hits, 1);
}

#[tokio::test]
async fn test_render_next_past_default_is_an_error() {
    let mut tree = Tree::new();
    let p = tree.create(PARA);

    let mut engine = RenderEngine::new();
    engine.set_default_converter(PastTheEnd);
    let result = engine.render(Arc::new(tree), p).await;
    assert_eq!(result, Err(RenderError::EndOfChain { node: p, index: 1 }));
}

#[tokio::test]
async fn test_unknown_node() {
    let tree = Tree::new();
    let result = RenderEngine::new().render(Arc::new(tree), NodeId(3)).await;
    assert_eq!(result, Err(RenderError::UnknownNode(NodeId(3))));
}

#[tokio::test]
async fn test_node_ids_emitted_when_enabled() {
    let mut tree = Tree::new();
    let p = tree.create(PARA);
    let engine = RenderEngine::with_options(RenderOptions {
        emit_node_ids: true,
        ..RenderOptions::default()
    });
    let output = engine.render(Arc::new(tree), p).await.unwrap();
    assert_eq!(output.nodes[0].attr("data-node-id"), Some("0"));
}
