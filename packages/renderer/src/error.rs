use quire_common::DispatchError;
use quire_tree::{NodeId, TreeError};
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Render failures.
///
/// Nodes of unknown kinds are not an error; the default converter renders
/// them generically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Node not found: {0}")]
    UnknownNode(NodeId),

    #[error("No converter after position {index} accepts {node}")]
    EndOfChain { node: NodeId, index: usize },

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Converter '{converter}' failed: {message}")]
    Converter { converter: String, message: String },
}

impl RenderError {
    pub fn converter(converter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Converter {
            converter: converter.into(),
            message: message.into(),
        }
    }
}
