//! # Quire Renderer
//!
//! Rendering engine: node subtrees → host nodes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_renderer::RenderEngine;
//!
//! let mut engine = RenderEngine::new();
//! engine.register(ParagraphRenderer)?;
//!
//! let output = engine.render_contents(Arc::new(tree), root).await?;
//! let html = quire_common::to_html(&output.nodes, &Default::default());
//! ```

pub mod converters;
pub mod engine;
pub mod error;
pub mod options;

pub use converters::DefaultRenderConverter;
pub use engine::{RenderContext, RenderConverter, RenderEngine, RenderOutput};
pub use error::{RenderError, RenderResult};
pub use options::RenderOptions;
