//! Text normalization and printed-label handling.
//!
//! Digitized books carry legacy punctuation entities, non-breaking spaces
//! and redundant printed item labels. This module canonicalizes that text
//! into plain, searchable form.

use crate::patterns::{BARE_NUMBER, LEADING_LABEL, NAMED_ENTITY, WHITESPACE_RUN};

/// Normalizes a text fragment: decodes leftover named entities,
/// canonicalizes quotation marks and dashes, collapses whitespace runs to a
/// single space and trims the ends.
///
/// Curly quotes become their straight ASCII forms and en dashes widen to em
/// dashes, so downstream search does not have to care which variant the
/// digitization used.
///
/// # Examples
///
/// ```
/// let text = capitula::normalize("\u{201c}So\u{a0}it   is.\u{201d}");
/// assert_eq!(text, "\"So it is.\"");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let canonical = canonicalize(text);
    WHITESPACE_RUN.replace_all(&canonical, " ").trim().to_string()
}

/// Like [`normalize`] but without trimming the ends. Used on individual
/// text nodes so that the space separating two adjacent nodes survives
/// until the fragments are joined.
#[must_use]
pub(crate) fn collapse(text: &str) -> String {
    let canonical = canonicalize(text);
    WHITESPACE_RUN.replace_all(&canonical, " ").into_owned()
}

/// Removes the printed label from the head of an item's text: `12. `,
/// `4) `, `7: `, `12b. ` or a bare number followed by whitespace. Returns
/// the text unchanged when no label is present.
#[must_use]
pub fn strip_leading_label(text: &str) -> &str {
    match LEADING_LABEL.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Returns the canonical digits when the whole block is nothing but a
/// number (optionally closed by `.` or `)`).
#[must_use]
pub fn bare_number(text: &str) -> Option<&str> {
    BARE_NUMBER
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether a normalized block is too short to be content on its own.
#[must_use]
pub(crate) fn is_trivial(text: &str, min_chars: usize) -> bool {
    text.chars().count() < min_chars
}

fn canonicalize(text: &str) -> String {
    let decoded = NAMED_ENTITY.replace_all(text, |caps: &regex::Captures<'_>| {
        match entity_replacement(&caps[1]) {
            Some(repl) => repl.to_string(),
            None => caps[0].to_string(),
        }
    });
    decoded.chars().map(canonical_char).collect()
}

fn canonical_char(ch: char) -> char {
    match ch {
        '\u{201c}' | '\u{201d}' | '\u{201e}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201a}' => '\'',
        '\u{2013}' => '\u{2014}',
        '\u{a0}' => ' ',
        other => other,
    }
}

/// Canonical replacement for a named entity left verbatim in the text,
/// typically by a double-encoded digitization pass.
fn entity_replacement(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" | "ldquo" | "rdquo" => "\"",
        "apos" | "lsquo" | "rsquo" => "'",
        "nbsp" => " ",
        "ndash" | "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "agrave" => "à",
        "aacute" => "á",
        "acirc" => "â",
        "auml" => "ä",
        "egrave" => "è",
        "eacute" => "é",
        "ecirc" => "ê",
        "igrave" => "ì",
        "iacute" => "í",
        "ograve" => "ò",
        "oacute" => "ó",
        "ocirc" => "ô",
        "ouml" => "ö",
        "ugrave" => "ù",
        "uacute" => "ú",
        "uuml" => "ü",
        "ntilde" => "ñ",
        "ccedil" => "ç",
        _ => return None,
    })
}
