//! Inline formatting extraction.
//!
//! Converts an element's subtree into [`RichText`]: literal runs plus
//! nested spans for the few formatting elements the legacy markup uses.
//! Unrecognized elements are transparent, so the plain text of the result
//! always matches the source text regardless of how the digitization
//! nested its wrappers.

use url::Url;

use crate::dom::{self, NodeRef};
use crate::model::{RichText, SpanKind};
use crate::text;

/// Extracts the richly formatted text of a node's subtree, normalized.
#[must_use]
pub fn extract(node: NodeRef<'_>) -> RichText {
    let mut out = RichText::new();
    push_node(node, &mut out);
    out.normalized()
}

/// Appends one node's content to an accumulator without normalizing.
/// Range walks push several nodes into the same accumulator and normalize
/// once at the end.
pub(crate) fn push_node(node: NodeRef<'_>, out: &mut RichText) {
    if node.is_text() {
        out.push_text(&text::collapse(&node.text()));
        return;
    }
    if !node.is_element() {
        return;
    }

    let tag = dom::node_tag(node).unwrap_or_default();
    match tag.as_str() {
        // Script and style text is not content.
        "script" | "style" | "noscript" => {}
        "br" => out.push_newline(),
        "i" | "em" | "cite" => push_span(node, SpanKind::Italic, out),
        "b" | "strong" => push_span(node, SpanKind::Bold, out),
        "u" => push_span(node, SpanKind::Underline, out),
        "sup" => push_span(node, SpanKind::Superscript, out),
        "sub" => push_span(node, SpanKind::Subscript, out),
        "a" => push_link(node, out),
        _ => push_children(node, out),
    }
}

fn push_children(node: NodeRef<'_>, out: &mut RichText) {
    for child in node.children() {
        push_node(child, out);
    }
}

fn push_span(node: NodeRef<'_>, kind: SpanKind, out: &mut RichText) {
    let mut inner = RichText::new();
    push_children(node, &mut inner);
    out.push_span(kind, inner);
}

/// Links leaving the book become reference spans; everything else (anchors
/// without an href, fragment jumps, relative paths) is unwrapped to its
/// text.
fn push_link(node: NodeRef<'_>, out: &mut RichText) {
    let href = dom::node_attr(node, "href").unwrap_or_default();
    match external_target(&href) {
        Some(target) => {
            let mut inner = RichText::new();
            push_children(node, &mut inner);
            out.push_span(SpanKind::Reference { target }, inner);
        }
        None => push_children(node, out),
    }
}

/// An href counts as external when it parses as an absolute URL with a
/// host. The returned target is the parsed URL's canonical form.
fn external_target(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let url = Url::parse(href).ok()?;
    if url.has_host() {
        Some(url.to_string())
    } else {
        None
    }
}
