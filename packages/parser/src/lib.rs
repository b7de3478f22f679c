//! # Quire Parser
//!
//! Parsing engine: host items → node subtrees.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_parser::ParseEngine;
//! use quire_common::{HostDocument, HostNode};
//! use quire_tree::Tree;
//!
//! let host = Arc::new(HostDocument::from_nodes(vec![
//!     HostNode::element("p").with_child(HostNode::text("hello")),
//! ]));
//!
//! let mut engine = ParseEngine::new();
//! engine.register(ParagraphConverter)?;
//!
//! let mut tree = Tree::new();
//! let output = engine.parse(host, &mut tree).await?;
//! ```

pub mod converters;
pub mod engine;
pub mod error;

pub use converters::DefaultParseConverter;
pub use engine::{
    HostMatcher, HostPredicate, ParseContext, ParseConverter, ParseEngine, ParseOptions,
    ParseOutput,
};
pub use error::{ParseError, ParseResult};
