use serde::{Deserialize, Serialize};

/// Options for the default render converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Element tag used for nodes no converter claims
    pub placeholder_tag: String,
    /// Element appended to empty containers so they stay visible
    pub line_break_tag: String,
    /// Attribute recording the node kind on generic elements
    pub kind_attribute: String,
    /// Also emit `data-node-id` on generic elements
    pub emit_node_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder_tag: "div".to_string(),
            line_break_tag: "br".to_string(),
            kind_attribute: "data-kind".to_string(),
            emit_node_ids: false,
        }
    }
}
