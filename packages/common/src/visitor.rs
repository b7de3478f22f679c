use crate::host::{HostAttributes, HostNode};

/// Visitor pattern for walking host trees immutably
///
/// Default implementations walk the entire tree. Override specific
/// `visit_*` methods to act on nodes.
pub trait HostVisitor: Sized {
    fn visit_node(&mut self, node: &HostNode) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, _tag: &str, _attributes: &HostAttributes, children: &[HostNode]) {
        walk_children(self, children);
    }

    fn visit_text(&mut self, _content: &str) {
        // Leaf node, no children to walk
    }

    fn visit_comment(&mut self, _content: &str) {
        // Leaf node, no children to walk
    }
}

pub fn walk_node<V: HostVisitor>(visitor: &mut V, node: &HostNode) {
    match node {
        HostNode::Element {
            tag,
            attributes,
            children,
        } => visitor.visit_element(tag, attributes, children),
        HostNode::Text { content } => visitor.visit_text(content),
        HostNode::Comment { content } => visitor.visit_comment(content),
    }
}

pub fn walk_children<V: HostVisitor>(visitor: &mut V, children: &[HostNode]) {
    for child in children {
        visitor.visit_node(child);
    }
}

/// Concatenated text of a host subtree, comments excluded.
pub fn text_content(node: &HostNode) -> String {
    struct TextCollector(String);

    impl HostVisitor for TextCollector {
        fn visit_text(&mut self, content: &str) {
            self.0.push_str(content);
        }
    }

    let mut collector = TextCollector(String::new());
    collector.visit_node(node);
    collector.0
}
