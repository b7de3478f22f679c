use crate::{RenderContext, RenderConverter, RenderResult};
use async_trait::async_trait;
use quire_common::{is_void_element, HostAttributes, HostNode, COMMENT_TAG, TEXT_TAG};
use quire_tree::{Matcher, NodeId, PLACEHOLDER_TAG_ATTR, PLACEHOLDER_TEXT_ATTR};

/// Fallback for nodes no registered converter accepts.
///
/// - markers render to nothing
/// - placeholder nodes rebuild the host item they were parsed from
/// - anything else becomes a generic element tagged with its kind
///
/// A non-atomic node whose children render to nothing gets a single line
/// break child, so an empty paragraph still takes up a line.
pub struct DefaultRenderConverter;

#[async_trait]
impl RenderConverter for DefaultRenderConverter {
    fn name(&self) -> &'static str {
        "default"
    }

    fn matcher(&self) -> Option<Matcher> {
        None
    }

    async fn render(&self, cx: &RenderContext, node: NodeId) -> RenderResult<Vec<HostNode>> {
        let tree = cx.tree();
        let Some(data) = tree.node(node) else {
            return Ok(Vec::new());
        };
        if data.is_marker() {
            return Ok(Vec::new());
        }

        let mut attributes = HostAttributes::new();
        let tag = match data.attributes().get(PLACEHOLDER_TAG_ATTR) {
            Some(tag) if tag == TEXT_TAG => {
                let content = tree.attr(node, PLACEHOLDER_TEXT_ATTR).unwrap_or_default();
                return Ok(vec![HostNode::text(content)]);
            }
            Some(tag) if tag == COMMENT_TAG => {
                let content = tree.attr(node, PLACEHOLDER_TEXT_ATTR).unwrap_or_default();
                return Ok(vec![HostNode::comment(content)]);
            }
            Some(tag) => {
                attributes.extend(
                    data.attributes()
                        .iter()
                        .filter(|(k, _)| k.as_str() != PLACEHOLDER_TAG_ATTR)
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
                tag.clone()
            }
            None => {
                let options = cx.options();
                attributes.insert(options.kind_attribute.clone(), data.kind().name().to_string());
                if options.emit_node_ids {
                    attributes.insert("data-node-id".to_string(), node.0.to_string());
                }
                attributes.extend(data.attributes().iter().map(|(k, v)| (k.clone(), v.clone())));
                options.placeholder_tag.clone()
            }
        };

        let mut children = cx.render_children(node).await?;
        if children.is_empty() && !data.kind().is_atomic() && !is_void_element(&tag) {
            children.push(HostNode::element(cx.options().line_break_tag.clone()));
        }

        Ok(vec![HostNode::Element {
            tag,
            attributes,
            children,
        }])
    }
}
