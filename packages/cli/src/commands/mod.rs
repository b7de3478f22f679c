pub mod edit;
pub mod init;
pub mod inspect;
pub mod render;

pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use render::{render, RenderArgs};

use crate::config::{Config, OutputFormat};
use anyhow::{Context, Result};
use quire_common::{to_html, HostDocument, HostNode, HtmlOptions};
use quire_editor::{Document, DocumentOptions};
use quire_parser::ParseEngine;
use quire_renderer::{RenderEngine, RenderOutput};
use std::path::Path;
use std::sync::Arc;

/// Read a JSON host document: an array of host nodes, or a single node.
pub fn load_host(path: &Path) -> Result<Arc<HostDocument>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let nodes: Vec<HostNode> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(Arc::new(HostDocument::from_nodes(nodes)))
}

/// Parse `path` into a fresh document.
pub async fn load_document(path: &Path, config: &Config) -> Result<Document> {
    let host = load_host(path)?;
    let parser = ParseEngine::with_options(config.parse.clone());
    let doc = Document::from_host(&parser, host, DocumentOptions::default()).await?;
    Ok(doc)
}

pub async fn render_document(doc: &Document, config: &Config) -> Result<RenderOutput> {
    let renderer = RenderEngine::with_options(config.render.clone());
    Ok(doc.render(&renderer).await?)
}

pub fn format_output(output: &RenderOutput, format: OutputFormat, pretty: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Html => to_html(
            &output.nodes,
            &HtmlOptions {
                pretty,
                ..HtmlOptions::default()
            },
        ),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(&output.nodes)?,
        OutputFormat::Json => serde_json::to_string(&output.nodes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_host_accepts_single_node() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{ "type": "Element", "tag": "p" }"#).unwrap();
        let host = load_host(&path).unwrap();
        assert_eq!(host.roots().len(), 1);
        assert_eq!(host.tag(host.roots()[0]), Some("p"));
    }

    #[test]
    fn test_load_host_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_host(&path).unwrap_err();
        assert!(err.to_string().contains("is not valid JSON"));
    }
}
