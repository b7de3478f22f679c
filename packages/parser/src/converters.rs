use crate::{HostMatcher, ParseContext, ParseConverter, ParseResult};
use async_trait::async_trait;
use quire_common::{HostData, HostId};
use quire_tree::{Attributes, NodeId, NodeKind, PLACEHOLDER_TAG_ATTR, PLACEHOLDER_TEXT_ATTR};

/// Fallback for items no registered converter accepts.
///
/// Produces a [`NodeKind::PLACEHOLDER`] node carrying the item's tag and
/// attributes, with children converted by recursive dispatch. Text and
/// comment items keep their content in [`PLACEHOLDER_TEXT_ATTR`].
pub struct DefaultParseConverter;

#[async_trait]
impl ParseConverter for DefaultParseConverter {
    fn name(&self) -> &'static str {
        "default"
    }

    fn matcher(&self) -> Option<HostMatcher> {
        None
    }

    async fn parse(&self, cx: &ParseContext, item: HostId) -> ParseResult<Vec<NodeId>> {
        let Some(entry) = cx.host().get(item) else {
            return Ok(Vec::new());
        };

        let mut attributes = Attributes::new();
        match &entry.data {
            HostData::Element { tag, attributes: host_attrs } => {
                attributes.insert(PLACEHOLDER_TAG_ATTR.to_string(), tag.clone());
                attributes.extend(host_attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            HostData::Text(content) => {
                if cx.options().skip_whitespace_text && content.trim().is_empty() {
                    return Ok(Vec::new());
                }
                attributes.insert(PLACEHOLDER_TAG_ATTR.to_string(), quire_common::TEXT_TAG.to_string());
                attributes.insert(PLACEHOLDER_TEXT_ATTR.to_string(), content.clone());
            }
            HostData::Comment(content) => {
                if !cx.options().keep_comments {
                    return Ok(Vec::new());
                }
                attributes.insert(PLACEHOLDER_TAG_ATTR.to_string(), quire_common::COMMENT_TAG.to_string());
                attributes.insert(PLACEHOLDER_TEXT_ATTR.to_string(), content.clone());
            }
        }

        let node = cx.with_tree(|tree| tree.create_with(NodeKind::PLACEHOLDER, attributes))?;
        cx.parse_children_into(node, item).await?;
        Ok(vec![node])
    }
}
