//! # Quire Common
//!
//! Pieces shared by the parsing and rendering engines:
//!
//! - the host tree model ([`HostNode`], [`HostDocument`]) that converters
//!   read from and write to
//! - an HTML writer for host nodes
//! - the converter [`Registry`] and per-run [`Memo`] implementing the
//!   dispatch protocol both engines follow

pub mod dispatch;
pub mod error;
pub mod host;
pub mod html;
pub mod result;
pub mod visitor;

pub use dispatch::{Memo, MemoReset, Registry, RunStats, Selected, SharedConversion};
pub use error::*;
pub use host::{HostAttributes, HostData, HostDocument, HostEntry, HostId, HostNode, COMMENT_TAG, TEXT_TAG};
pub use html::{is_void_element, to_html, HtmlOptions};
pub use result::*;
pub use visitor::*;
