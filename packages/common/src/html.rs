//! HTML output for host nodes.
//!
//! Names are reduced to characters that cannot end a tag or attribute
//! (ASCII alphanumerics, `-`, `_`, `:` and `.`), text and attribute values
//! are entity-escaped, and comment bodies are broken up so they cannot
//! close the comment early. In pretty mode an element holding text is kept
//! on one line so no whitespace is added to its content.

use crate::host::{HostAttributes, HostNode};
use crate::visitor::{walk_children, HostVisitor};

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Put each node on its own line, indented by depth
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect()
}

fn escape_comment(content: &str) -> String {
    let mut out = content.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    if out.starts_with('>') || out.starts_with("->") {
        out.insert(0, ' ');
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}

struct HtmlWriter<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> HtmlWriter<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
        self.buffer.push_str(text);
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn open_tag(tag: &str, attributes: &HostAttributes) -> String {
        let mut out = format!("<{}", tag);
        for (name, value) in attributes {
            let name = sanitize_name(name);
            if name.is_empty() {
                continue;
            }
            out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
        out.push('>');
        out
    }
}

impl HostVisitor for HtmlWriter<'_> {
    fn visit_element(&mut self, tag: &str, attributes: &HostAttributes, children: &[HostNode]) {
        let mut tag = sanitize_name(tag);
        if tag.is_empty() {
            tag = "div".to_string();
        }
        let tag = tag.as_str();
        let open = Self::open_tag(tag, attributes);
        if is_void_element(tag) {
            self.add_line(&open);
            return;
        }
        if children.is_empty() {
            self.add_line(&format!("{}</{}>", open, tag));
            return;
        }
        if self.options.pretty && children.iter().any(HostNode::is_text) {
            let inline = HtmlOptions {
                pretty: false,
                ..self.options.clone()
            };
            let inner = to_html(children, &inline);
            self.add_line(&format!("{}{}</{}>", open, inner, tag));
            return;
        }
        self.add_line(&open);
        self.depth += 1;
        walk_children(self, children);
        self.depth -= 1;
        self.add_line(&format!("</{}>", tag));
    }

    fn visit_text(&mut self, content: &str) {
        self.add_line(&escape_text(content));
    }

    fn visit_comment(&mut self, content: &str) {
        self.add_line(&format!("<!--{}-->", escape_comment(content)));
    }
}

/// Serialize host nodes to HTML
pub fn to_html(nodes: &[HostNode], options: &HtmlOptions) -> String {
    let mut writer = HtmlWriter::new(options);
    walk_children(&mut writer, nodes);
    writer.buffer
}
