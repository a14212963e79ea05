//! Escaping of text embedded in generated script source.
//!
//! The result is valid inside either a single- or double-quoted script
//! string literal.

use std::fmt::Write;

use unicode_general_category::{GeneralCategory, get_general_category};

/// Backslash-escape `s` for embedding in a script string literal.
///
/// - `\\ \t \b \n \r \f \' \"` use their two-character escapes
/// - NUL is always `\u0000`; a bare `\0` would merge with following digits
/// - other ASCII control characters become `\u00XX`
/// - non-ASCII letters and numbers pass through unchanged
/// - everything else becomes `\uXXXX`, one escape per UTF-16 unit
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(16 + s.len() * 11 / 10);
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\u0000"),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if !c.is_ascii() && passes_through(c) => out.push(c),
            c => push_unicode_escape(&mut out, c),
        }
    }
    out
}

/// Quote `s` as a single-quoted script string literal.
pub fn quote(s: &str) -> String {
    format!("'{}'", escape(s))
}

fn passes_through(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
            | GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::OtherLetter
    )
}

fn push_unicode_escape(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        // writing to a String cannot fail
        let _ = write!(out, "\\u{:04X}", unit);
    }
}
