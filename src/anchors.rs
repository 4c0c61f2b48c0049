//! Anchor catalog construction.
//!
//! One pass over the document collects every anchor whose name follows the
//! family-number marker grammar. The catalog keeps document order and
//! resolves duplicate names to their first declaration, so later lookups
//! are position-stable.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::dom::{self, Document, NodeId, NodeRef};
use crate::patterns::MARKER;

/// Every marker anchor of a document mapped to the element declaring it.
///
/// Names come from `id` attributes on any element, and from `name`
/// attributes on `<a>` only; metadata elements use `name` for unrelated
/// purposes and must not shadow a section anchor. Names outside the
/// marker grammar never enter the catalog.
#[derive(Debug)]
pub struct AnchorCatalog<'a> {
    entries: IndexMap<String, NodeRef<'a>>,
    ids: HashSet<NodeId>,
}

impl<'a> AnchorCatalog<'a> {
    /// Scans the document and builds the catalog.
    #[must_use]
    pub fn build(doc: &'a Document) -> Self {
        let mut entries: IndexMap<String, NodeRef<'a>> = IndexMap::new();
        if let Some(root) = dom::document_root(doc) {
            for node in root.descendants() {
                if !node.is_element() {
                    continue;
                }
                if let Some(id) = dom::node_attr(node, "id") {
                    insert_first(&mut entries, &id, node);
                }
                if dom::node_tag(node).as_deref() == Some("a") {
                    if let Some(name) = dom::node_attr(node, "name") {
                        insert_first(&mut entries, &name, node);
                    }
                }
            }
        }
        let ids = entries.values().map(|node| node.id).collect();
        debug!(anchors = entries.len(), "anchor catalog built");
        Self { entries, ids }
    }

    /// The node declaring `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeRef<'a>> {
        self.entries.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether this node is the winning declaration of some anchor. Range
    /// walks stop on these.
    #[must_use]
    pub fn is_anchor_node(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Node ids of all winning declarations.
    #[must_use]
    pub fn node_ids(&self) -> &HashSet<NodeId> {
        &self.ids
    }

    /// Anchor names with their nodes, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeRef<'a>)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), *node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert_first<'a>(entries: &mut IndexMap<String, NodeRef<'a>>, name: &str, node: NodeRef<'a>) {
    let name = name.trim();
    if !MARKER.is_match(name) {
        return;
    }
    entries.entry(name.to_string()).or_insert(node);
}
