//! Document kinds: what differs between the editor variants.

use std::path::Path;

use encoding_rs::Encoding;

use super::document_io::{self, LoadedText};
use super::markdown;
use crate::app::infrastructure::error::Result;

/// A file filter for open/save choosers, in FLTK's `Description\tPattern`
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub pattern: &'static str,
}

impl FileFilter {
    pub const fn new(description: &'static str, pattern: &'static str) -> Self {
        Self { description, pattern }
    }
}

/// Join filters into the multi-line form FLTK choosers take.
pub fn filter_string(filters: &[FileFilter]) -> String {
    filters
        .iter()
        .map(|f| format!("{}\t{}", f.description, f.pattern))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlighting modes the editor page knows.
pub const EDITOR_MODES: &[&str] = &[
    "text", "rust", "python", "javascript", "clike", "json", "shell", "properties", "xml", "css",
    "markdown",
];

/// Editor mode for a file extension; unknown extensions edit as plain text.
pub fn mode_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "py" | "pyw" => "python",
        "js" | "jsx" | "mjs" | "ts" | "tsx" => "javascript",
        "c" | "h" | "cc" | "cpp" | "hpp" | "java" | "cs" | "go" | "kt" => "clike",
        "json" => "json",
        "sh" | "bash" | "zsh" => "shell",
        "toml" | "ini" | "cfg" | "conf" | "properties" | "yaml" | "yml" => "properties",
        "xml" | "html" | "htm" | "svg" => "xml",
        "css" | "scss" => "css",
        "md" | "markdown" => "markdown",
        _ => "text",
    }
}

/// Strategy supplied by each editor variant.
///
/// `load` and `write` run on worker threads.
pub trait DocumentKind: Send + Sync + 'static {
    /// Application name; also names the preferences file.
    fn app_name(&self) -> &'static str;

    /// Content of a new, empty document.
    fn create_empty(&self) -> String {
        String::new()
    }

    fn load(&self, path: &Path) -> Result<LoadedText> {
        document_io::read_text(path)
    }

    /// Write `text` and return the encoding actually used. `bom` asks for
    /// a leading byte order mark.
    fn write(&self, path: &Path, text: &str, encoding: &'static Encoding, bom: bool) -> Result<&'static Encoding> {
        document_io::write_text(path, text, encoding, bom)
    }

    /// Editor mode hint for a document at `path` (`None` for unsaved).
    fn mode_hint(&self, path: Option<&Path>) -> String;

    fn file_filters(&self) -> &'static [FileFilter];

    /// Whether the editor shows a rendered preview next to the source.
    fn has_preview(&self) -> bool {
        false
    }

    /// HTML for the preview pane, `None` when the kind has no preview.
    fn render_preview(&self, _text: &str) -> Option<String> {
        None
    }
}

const CODE_FILTERS: &[FileFilter] = &[
    FileFilter::new("Text Files", "*.txt"),
    FileFilter::new("Rust Files", "*.rs"),
    FileFilter::new("Python Files", "*.py"),
    FileFilter::new("JavaScript Files", "*.{js,jsx,ts,tsx}"),
    FileFilter::new("Java Files", "*.java"),
    FileFilter::new("Config Files", "*.{json,yaml,yml,toml,ini,cfg,conf,xml}"),
    FileFilter::new("Web Files", "*.{html,css,scss}"),
];

const MARKDOWN_FILTERS: &[FileFilter] = &[FileFilter::new("Markdown Files", "*.{md,markdown}")];

/// Plain text and source code; the mode follows the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeDocumentKind;

impl DocumentKind for CodeDocumentKind {
    fn app_name(&self) -> &'static str {
        "WebPad"
    }

    fn mode_hint(&self, path: Option<&Path>) -> String {
        let ext = path.and_then(|p| p.extension()).map(|ext| ext.to_string_lossy());
        mode_for_extension(ext.as_deref().unwrap_or("")).to_string()
    }

    fn file_filters(&self) -> &'static [FileFilter] {
        CODE_FILTERS
    }
}

/// Markdown documents; always edited in markdown mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownDocumentKind;

impl DocumentKind for MarkdownDocumentKind {
    fn app_name(&self) -> &'static str {
        "WebPadMarkdown"
    }

    fn mode_hint(&self, _path: Option<&Path>) -> String {
        "markdown".to_string()
    }

    fn file_filters(&self) -> &'static [FileFilter] {
        MARKDOWN_FILTERS
    }

    fn has_preview(&self) -> bool {
        true
    }

    fn render_preview(&self, text: &str) -> Option<String> {
        Some(markdown::render_html(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mode_from_extension() {
        let kind = CodeDocumentKind;
        assert_eq!(kind.mode_hint(Some(Path::new("/src/Main.RS"))), "rust");
        assert_eq!(kind.mode_hint(Some(Path::new("app.tsx"))), "javascript");
        assert_eq!(kind.mode_hint(Some(Path::new("Cargo.toml"))), "properties");
        assert_eq!(kind.mode_hint(Some(Path::new("/etc/hosts"))), "text");
        assert_eq!(kind.mode_hint(None), "text");
    }

    #[test]
    fn test_every_mode_is_known_to_editor() {
        let exts = [
            "rs", "py", "js", "ts", "c", "java", "json", "sh", "toml", "yaml", "html", "xml", "css",
            "md", "txt", "unknown",
        ];
        for ext in exts {
            let mode = mode_for_extension(ext);
            assert!(EDITOR_MODES.contains(&mode), "{} -> {}", ext, mode);
        }
    }

    #[test]
    fn test_only_markdown_has_preview() {
        assert!(!CodeDocumentKind.has_preview());
        assert_eq!(CodeDocumentKind.render_preview("# x"), None);

        assert!(MarkdownDocumentKind.has_preview());
        let html = MarkdownDocumentKind.render_preview("# x").unwrap();
        assert!(html.contains("<h1>x</h1>"));
    }

    #[test]
    fn test_markdown_mode_fixed() {
        let kind = MarkdownDocumentKind;
        assert_eq!(kind.mode_hint(Some(Path::new("a.txt"))), "markdown");
        assert_eq!(kind.mode_hint(None), "markdown");
    }

    #[test]
    fn test_filter_string_format() {
        let filter = filter_string(MarkdownDocumentKind.file_filters());
        assert_eq!(filter, "Markdown Files\t*.{md,markdown}");

        let filter = filter_string(CodeDocumentKind.file_filters());
        assert!(filter.contains('\n'));
        assert!(filter.starts_with("Text Files\t*.txt"));
    }

    #[test]
    fn test_default_create_empty() {
        assert_eq!(CodeDocumentKind.create_empty(), "");
    }
}
