//! lopdf document backend
//!
//! This module handles all PDF-specific operations:
//! - Loading documents and resolving inherited page attributes
//! - Wrapping modified pages into Form XObjects
//! - Building the output page tree

mod document;
mod page;
mod xobject;

pub use document::LopdfDocument;
pub use page::LopdfPage;
pub use xobject::{extract_number, get_page_content, get_trim_box};
