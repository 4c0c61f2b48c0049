//! DOM adapter for the segmentation engine.
//!
//! Thin, read-only helpers over `dom_query`. The source tree is never
//! mutated; every segmenter works by walking nodes and copying text out.
//! The document-order cursor lives here so that all range walks advance
//! through the tree the same way.

use std::collections::HashSet;

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril: dom_query hands text out as reference-counted
// tendrils, cheap to clone and Deref to str.
pub use tendril::StrTendril;

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The `<html>` element of a parsed document.
///
/// The bundled parser always builds a full `html > head + body` scaffold,
/// even for fragments, so this only returns `None` for a selection engine
/// failure.
#[must_use]
pub fn document_root(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("html").nodes().first().copied()
}

/// The `<body>` element of a parsed document.
#[must_use]
pub fn body(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("body").nodes().first().copied()
}

// === Node Information ===

/// Lowercase tag name of an element node.
#[inline]
#[must_use]
pub fn node_tag(node: NodeRef<'_>) -> Option<String> {
    node.node_name().map(|name| name.to_ascii_lowercase())
}

/// An attribute value of an element node.
#[inline]
#[must_use]
pub fn node_attr(node: NodeRef<'_>, name: &str) -> Option<String> {
    Selection::from(node).attr(name).map(|value| value.to_string())
}

/// Whether an element's class attribute has a token containing `needle`.
/// The needle must be lowercase; tokens are compared case-insensitively.
#[must_use]
pub fn class_token_contains(node: NodeRef<'_>, needle: &str) -> bool {
    node_attr(node, "class").is_some_and(|class| {
        class
            .split_whitespace()
            .any(|token| token.to_ascii_lowercase().contains(needle))
    })
}

// === Document-Order Cursor ===

/// First child of a node, text nodes included.
#[inline]
#[must_use]
pub fn first_child(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    node.children().into_iter().next()
}

/// Next node in document order: the first child if there is one, otherwise
/// the nearest following sibling up the ancestor chain.
#[must_use]
pub fn next_in_document_order(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    if let Some(child) = first_child(node) {
        return Some(child);
    }
    next_skipping_subtree(node)
}

/// Next node in document order without entering the node's own subtree.
#[must_use]
pub fn next_skipping_subtree(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}

// === Containment ===

/// Whether `ancestor` contains `node`. A node contains itself.
#[must_use]
pub fn contains(ancestor: NodeRef<'_>, node: NodeRef<'_>) -> bool {
    let mut current = Some(node);
    while let Some(cursor) = current {
        if cursor.id == ancestor.id {
            return true;
        }
        current = cursor.parent();
    }
    false
}

/// Whether any node of `node`'s subtree, the node itself excluded, is in
/// `ids`.
#[must_use]
pub fn subtree_contains_any(node: NodeRef<'_>, ids: &HashSet<NodeId>) -> bool {
    node.descendants()
        .into_iter()
        .any(|descendant| descendant.id != node.id && ids.contains(&descendant.id))
}

/// Path from the document root down to `node`, both ends inclusive.
#[must_use]
pub fn root_path(node: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut path = Vec::new();
    let mut current = Some(node);
    while let Some(cursor) = current {
        path.push(cursor);
        current = cursor.parent();
    }
    path.reverse();
    path
}
