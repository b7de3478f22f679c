//! # Host Tree
//!
//! The external representation converters translate to and from, shaped like
//! a markup document: elements with ordered attributes, text and comments.
//!
//! Rendering produces owned [`HostNode`] trees. Parsing reads a
//! [`HostDocument`], which flattens nodes into an arena so every item has a
//! stable [`HostId`] for the duration of a parse run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type HostAttributes = IndexMap<String, String>;

/// Tag identity reported for text items.
pub const TEXT_TAG: &str = "#text";

/// Tag identity reported for comment items.
pub const COMMENT_TAG: &str = "#comment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostNode {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        attributes: HostAttributes,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<HostNode>,
    },

    Text { content: String },

    Comment { content: String },
}

impl HostNode {
    pub fn element(tag: impl Into<String>) -> Self {
        HostNode::Element {
            tag: tag.into(),
            attributes: HostAttributes::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        HostNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        HostNode::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let HostNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: HostNode) -> Self {
        if let HostNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = HostNode>) -> Self {
        if let HostNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Element tag, or [`TEXT_TAG`] / [`COMMENT_TAG`].
    pub fn tag(&self) -> &str {
        match self {
            HostNode::Element { tag, .. } => tag,
            HostNode::Text { .. } => TEXT_TAG,
            HostNode::Comment { .. } => COMMENT_TAG,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            HostNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[HostNode] {
        match self {
            HostNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, HostNode::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, HostNode::Text { .. })
    }
}

/// Identity of an item inside a [`HostDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(pub u32);

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host#{}", self.0)
    }
}

/// Payload of an arena entry, without children.
#[derive(Debug, Clone, PartialEq)]
pub enum HostData {
    Element {
        tag: String,
        attributes: HostAttributes,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub data: HostData,
    pub parent: Option<HostId>,
    pub children: Vec<HostId>,
}

/// Read-only arena view of a list of host nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostDocument {
    entries: Vec<HostEntry>,
    roots: Vec<HostId>,
}

impl HostDocument {
    pub fn from_nodes(nodes: impl IntoIterator<Item = HostNode>) -> Self {
        let mut doc = Self::default();
        for node in nodes {
            let id = doc.push(node, None);
            doc.roots.push(id);
        }
        doc
    }

    fn push(&mut self, node: HostNode, parent: Option<HostId>) -> HostId {
        let id = HostId(self.entries.len() as u32);
        let (data, children) = match node {
            HostNode::Element {
                tag,
                attributes,
                children,
            } => (HostData::Element { tag, attributes }, children),
            HostNode::Text { content } => (HostData::Text(content), Vec::new()),
            HostNode::Comment { content } => (HostData::Comment(content), Vec::new()),
        };
        self.entries.push(HostEntry {
            data,
            parent,
            children: Vec::new(),
        });
        let child_ids: Vec<HostId> = children
            .into_iter()
            .map(|child| self.push(child, Some(id)))
            .collect();
        self.entries[id.0 as usize].children = child_ids;
        id
    }

    pub fn roots(&self) -> &[HostId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: HostId) -> Option<&HostEntry> {
        self.entries.get(id.0 as usize)
    }

    pub fn children(&self, id: HostId) -> &[HostId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: HostId) -> Option<HostId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn tag(&self, id: HostId) -> Option<&str> {
        self.get(id).map(|e| match &e.data {
            HostData::Element { tag, .. } => tag.as_str(),
            HostData::Text(_) => TEXT_TAG,
            HostData::Comment(_) => COMMENT_TAG,
        })
    }

    pub fn attributes(&self, id: HostId) -> Option<&HostAttributes> {
        match &self.get(id)?.data {
            HostData::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attr(&self, id: HostId, name: &str) -> Option<&str> {
        self.attributes(id)?.get(name).map(String::as_str)
    }

    /// Content of a text or comment item.
    pub fn content(&self, id: HostId) -> Option<&str> {
        match &self.get(id)?.data {
            HostData::Text(content) | HostData::Comment(content) => Some(content),
            HostData::Element { .. } => None,
        }
    }

    pub fn is_text(&self, id: HostId) -> bool {
        matches!(self.get(id).map(|e| &e.data), Some(HostData::Text(_)))
    }

    /// Rebuild the owned subtree at `id`.
    pub fn to_node(&self, id: HostId) -> Option<HostNode> {
        let entry = self.get(id)?;
        Some(match &entry.data {
            HostData::Element { tag, attributes } => HostNode::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                children: entry
                    .children
                    .iter()
                    .filter_map(|&c| self.to_node(c))
                    .collect(),
            },
            HostData::Text(content) => HostNode::text(content.clone()),
            HostData::Comment(content) => HostNode::comment(content.clone()),
        })
    }
}
