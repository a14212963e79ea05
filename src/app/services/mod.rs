//! Services layer - file operations shared by the editor variants.
//!
//! - Charset detection and text I/O
//! - Document kinds (code, markdown)
//! - Markdown preview rendering

pub mod document_io;
pub mod kinds;
pub mod markdown;

pub use kinds::{CodeDocumentKind, DocumentKind, FileFilter, MarkdownDocumentKind};
