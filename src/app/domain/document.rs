use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use url::Url;

use crate::app::infrastructure::error::{AppError, Result};

/// Where a document lives: a `file://` URI, or nowhere yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Void,
    Uri(Url),
}

impl Location {
    /// Location of a local file. Relative paths resolve against the
    /// current directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let absolute = std::path::absolute(path)?;
        Url::from_file_path(&absolute)
            .map(Self::Uri)
            .map_err(|_| {
                AppError::document_io(
                    path.display().to_string(),
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local file path"),
                )
            })
    }

    pub fn parse(uri: &str) -> Option<Self> {
        let url = Url::parse(uri).ok()?;
        (url.scheme() == "file").then_some(Self::Uri(url))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Self::Void => None,
            Self::Uri(url) => url.to_file_path().ok(),
        }
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Void => None,
            Self::Uri(url) => Some(url.as_str()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => match self {
                Self::Void => f.write_str("<void>"),
                Self::Uri(url) => f.write_str(url.as_str()),
            },
        }
    }
}

/// The one file open in a controller.
///
/// A document is never re-pointed at another file; opening or creating
/// replaces it.
#[derive(Debug, Clone)]
pub struct Document {
    location: Location,
    dirty: bool,
    charset: &'static Encoding,
    bom: bool,
    read_only: bool,
}

impl Document {
    /// A fresh, unsaved document.
    pub fn void() -> Self {
        Self {
            location: Location::Void,
            dirty: false,
            charset: UTF_8,
            bom: false,
            read_only: false,
        }
    }

    /// A document just loaded from `location`.
    pub fn loaded(location: Location, charset: &'static Encoding, read_only: bool) -> Self {
        Self {
            location,
            dirty: false,
            charset,
            bom: false,
            read_only,
        }
    }

    /// Mark the file as led by a byte order mark, kept on save.
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_void()
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.location.path()
    }

    /// File name of the location; empty for an unsaved document.
    pub fn name(&self) -> String {
        self.path()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Record a successful save to `location` with `charset`.
    pub(crate) fn saved_as(&mut self, location: Location, charset: &'static Encoding) {
        self.location = location;
        self.charset = charset;
        self.dirty = false;
        self.read_only = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn test_void_document() {
        let doc = Document::void();
        assert!(!doc.has_location());
        assert!(!doc.is_dirty());
        assert_eq!(doc.name(), "");
        assert_eq!(doc.charset(), UTF_8);
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_location_from_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes file.txt");
        let location = Location::from_path(&path).unwrap();

        assert!(location.uri().unwrap().starts_with("file://"));
        assert!(location.uri().unwrap().contains("notes%20file.txt"));
        assert_eq!(location.path().unwrap(), path);
        assert_eq!(Location::parse(location.uri().unwrap()), Some(location));
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert_eq!(Location::parse("https://example.com/a.txt"), None);
        assert_eq!(Location::parse("not a uri"), None);
    }

    #[test]
    fn test_loaded_document_name_and_charset() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::from_path(&dir.path().join("main.rs")).unwrap();
        let doc = Document::loaded(location, WINDOWS_1252, true);

        assert_eq!(doc.name(), "main.rs");
        assert_eq!(doc.charset(), WINDOWS_1252);
        assert!(doc.is_read_only());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_saved_as_moves_location_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::void();
        doc.set_dirty(true);

        let location = Location::from_path(&dir.path().join("out.md")).unwrap();
        doc.saved_as(location.clone(), UTF_8);
        assert_eq!(doc.location(), &location);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_bom_kept_across_save_as() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::from_path(&dir.path().join("a.txt")).unwrap();
        let mut doc = Document::loaded(location, UTF_8, false).with_bom(true);
        assert!(doc.has_bom());

        let moved = Location::from_path(&dir.path().join("b.txt")).unwrap();
        doc.saved_as(moved, UTF_8);
        assert!(doc.has_bom());
        assert!(!Document::void().has_bom());
    }
}
