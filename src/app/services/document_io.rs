//! Reading and writing document text with charset handling.
//!
//! Detection order on load: byte order mark, then UTF-8 validity, then
//! windows-1252 as the catch-all single-byte charset.

use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::app::infrastructure::error::{AppError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text decoded from a file, with what is needed to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedText {
    pub text: String,
    pub encoding: &'static Encoding,
    /// The file started with a byte order mark.
    pub bom: bool,
    /// The file could not be written by us when it was read.
    pub read_only: bool,
}

/// Detect the charset of `bytes`. Returns the encoding and the length of
/// its byte order mark, if any.
pub fn detect_charset(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len);
    }
    if std::str::from_utf8(bytes).is_ok() {
        (UTF_8, 0)
    } else {
        (WINDOWS_1252, 0)
    }
}

/// Decode `bytes`. Also returns whether a byte order mark was stripped.
pub fn decode(bytes: &[u8]) -> io::Result<(String, &'static Encoding, bool)> {
    let (encoding, bom_len) = detect_charset(bytes);
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed {} content", encoding.name()),
        ));
    }
    Ok((text.into_owned(), encoding, bom_len > 0))
}

/// Encode `text` for writing. Returns the bytes and the encoding actually
/// used; UTF-16 charsets are written as UTF-8.
pub fn encode(text: &str, encoding: &'static Encoding) -> io::Result<(Vec<u8>, &'static Encoding)> {
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("text contains characters not representable in {}", encoding.name()),
        ));
    }
    Ok((bytes.into_owned(), used))
}

pub fn read_text(path: &Path) -> Result<LoadedText> {
    let to_error = |e: io::Error| AppError::document_io(path.display().to_string(), e);

    let bytes = fs::read(path).map_err(to_error)?;
    let (text, encoding, bom) = decode(&bytes).map_err(to_error)?;
    let read_only = fs::metadata(path)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false);

    tracing::debug!(
        "read {} bytes from {} as {}",
        bytes.len(),
        path.display(),
        encoding.name()
    );
    Ok(LoadedText {
        text,
        encoding,
        bom,
        read_only,
    })
}

/// Write `text` to `path` with `encoding`, led by a UTF-8 byte order mark
/// when `bom` is set. Returns the encoding used.
pub fn write_text(path: &Path, text: &str, encoding: &'static Encoding, bom: bool) -> Result<&'static Encoding> {
    let to_error = |e: io::Error| AppError::document_io(path.display().to_string(), e);

    let (mut bytes, used) = encode(text, encoding).map_err(to_error)?;
    if bom && used == UTF_8 {
        bytes.splice(0..0, UTF8_BOM.iter().copied());
    }
    fs::write(path, &bytes).map_err(to_error)?;

    tracing::debug!("wrote {} bytes to {} as {}", bytes.len(), path.display(), used.name());
    Ok(used)
}
