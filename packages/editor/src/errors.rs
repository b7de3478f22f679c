//! Error types for the editor

use quire_parser::ParseError;
use quire_renderer::RenderError;
use quire_tree::{NodeId, TreeError};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Node {0} is not part of this document")]
    NotInDocument(NodeId),

    #[error("Node {0} is a range marker")]
    MarkerNode(NodeId),
}
