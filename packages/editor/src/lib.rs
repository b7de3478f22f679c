//! # Quire Editor
//!
//! Ranges, selections and the editable document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: host items → node tree              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + Selection                │
//! │  - markers live in the tree                 │
//! │  - edits go through the selection           │
//! │  - failed edits change nothing              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: node tree → host nodes            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_editor::{Document, DocumentOptions, Position};
//!
//! let mut doc = Document::from_host(&parser, host, DocumentOptions::default()).await?;
//! doc.select(a, Position::Before, b, Position::After)?;
//! doc.delete_selection()?;
//! let output = doc.render(&renderer).await?;
//! ```

mod document;
mod edits;
mod errors;
mod position;
mod range;
mod selection;

pub use document::{Document, DocumentOptions};
pub use edits::{break_block, delete_selection, insert_nodes, Edit};
pub use errors::{EditorError, EditorResult};
pub use position::{Boundary, Position};
pub use range::Range;
pub use selection::{Direction, Selection};
