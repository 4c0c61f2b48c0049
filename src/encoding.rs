//! Character encoding detection and transcoding.
//!
//! Book digitizations predate UTF-8 more often than not; windows-1252 and
//! ISO-8859-1 files with curly quotes in the high bytes are the norm. This
//! module sniffs the charset from a byte-order mark or the meta tags and
//! converts everything to UTF-8 before parsing.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect the character encoding of a source document.
///
/// Tried in order:
/// 1. byte-order mark
/// 2. `<meta charset="...">`
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 4. UTF-8 as the fallback
///
/// Only the first 1024 bytes are examined for meta tags.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = &bytes[..bytes.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = extract_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if let Some(charset) = extract_content_type_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    UTF_8
}

/// Extract charset from `<meta charset="...">` tag.
fn extract_charset(html: &str) -> Option<String> {
    META_CHARSET
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract charset from `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
fn extract_content_type_charset(html: &str) -> Option<String> {
    HTTP_EQUIV_CHARSET
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode source bytes into a UTF-8 string.
///
/// Invalid sequences are replaced rather than rejected; a stray byte in a
/// scanned book must never abort segmentation. A byte-order mark takes
/// precedence over any detected label and is stripped from the output.
///
/// # Examples
///
/// ```
/// let html = b"<html><body>Hello, World!</body></html>";
/// let text = capitula::encoding::decode(html);
/// assert!(text.contains("Hello, World!"));
/// ```
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, _encoding_used, _had_errors) = encoding.decode(bytes);
    text.into_owned()
}
