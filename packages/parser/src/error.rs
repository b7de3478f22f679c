use quire_common::{DispatchError, HostId};
use quire_tree::TreeError;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse failures.
///
/// Unrecognized input is never an error: the default converter handles it.
/// These variants cover converter bugs and misuse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown host item: {0}")]
    UnknownItem(HostId),

    #[error("No converter after position {index} accepts {item}")]
    EndOfChain { item: HostId, index: usize },

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Converter '{converter}' failed: {message}")]
    Converter { converter: String, message: String },
}

impl ParseError {
    pub fn converter(converter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Converter {
            converter: converter.into(),
            message: message.into(),
        }
    }
}
