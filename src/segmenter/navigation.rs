//! Navigation-range segmentation.
//!
//! Books without marker anchors usually open with a contents block whose
//! links name the sections. Each recognized link claims a section; the
//! section's content is the container holding the link's target plus the
//! container's following siblings, up to the sibling holding the next
//! target. Within a range, notes are read out of dedicated note
//! containers; every other section collects paragraph-like blocks.

use std::collections::HashMap;

use tracing::debug;

use crate::dom::{self, Document, NodeId, NodeRef};
use crate::formatting;
use crate::model::{BookModel, Item, RichText, Section};
use crate::options::Options;
use crate::segmenter::qa::QaMachine;
use crate::text;

enum LabelRule {
    Prefix(&'static str),
    Exact(&'static str),
}

/// Link labels recognized as section entries, matched case-insensitively
/// after normalization. `text` must match exactly so that labels like
/// "textual notes" do not claim the main text.
const NAV_LABELS: &[(LabelRule, Section)] = &[
    (LabelRule::Prefix("preface"), Section::Preface),
    (LabelRule::Prefix("introduction"), Section::Introduction),
    (LabelRule::Prefix("description"), Section::Description),
    (LabelRule::Exact("text"), Section::MainText),
    (LabelRule::Prefix("main text"), Section::MainText),
    (LabelRule::Prefix("supplement"), Section::Supplementary),
    (LabelRule::Prefix("question"), Section::Questions),
    (LabelRule::Prefix("synopsis"), Section::Synopsis),
    (LabelRule::Prefix("note"), Section::Notes),
    (LabelRule::Prefix("glossary"), Section::Glossary),
    (LabelRule::Prefix("key passage"), Section::KeyPassages),
];

/// Tags that make an element block-level for nesting checks.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "table", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Container tags that may hold a question block directly, without an
/// inner paragraph.
const QUESTION_CONTAINERS: &[&str] = &["div", "blockquote", "center", "td"];

/// Segments a book through its navigation links.
pub(crate) fn segment(doc: &Document, options: &Options) -> BookModel {
    let mut model = BookModel::default();
    let entries = navigation_entries(doc);
    if entries.is_empty() {
        debug!("no recognized navigation entries");
        return model;
    }
    for (index, (section, target)) in entries.iter().enumerate() {
        let next = entries.get(index + 1).map(|(_, node)| *node);
        let range = section_range(doc, *target, next);
        let items = match section {
            Section::Notes => note_items(&range),
            Section::Questions => question_items(&range, options),
            _ => block_items(*section, &range, options),
        };
        debug!(section = %section, items = items.len(), "navigation range segmented");
        model.push(*section, items);
    }
    model
}

/// Internal links with recognized labels, resolved to their target nodes,
/// in document order. The first link claiming a section wins.
fn navigation_entries(doc: &Document) -> Vec<(Section, NodeRef<'_>)> {
    let targets = anchor_targets(doc);
    let mut entries: Vec<(Section, NodeRef<'_>)> = Vec::new();
    let Some(root) = dom::document_root(doc) else {
        return entries;
    };
    for node in root.descendants() {
        if !node.is_element() || dom::node_tag(node).as_deref() != Some("a") {
            continue;
        }
        let Some(href) = dom::node_attr(node, "href") else {
            continue;
        };
        let Some(name) = href.trim().strip_prefix('#') else {
            continue;
        };
        let Some(section) = section_for_label(&text::normalize(&node.text())) else {
            continue;
        };
        if entries.iter().any(|(claimed, _)| *claimed == section) {
            continue;
        }
        let Some(target) = targets.get(name).copied() else {
            continue;
        };
        entries.push((section, target));
    }
    entries
}

/// Every link target of the document, by `id` anywhere and `name` on
/// `<a>`, first declaration winning. Unlike the marker catalog this map
/// accepts any name, since navigation targets are free-form.
fn anchor_targets(doc: &Document) -> HashMap<String, NodeRef<'_>> {
    let mut targets = HashMap::new();
    let Some(root) = dom::document_root(doc) else {
        return targets;
    };
    for node in root.descendants() {
        if !node.is_element() {
            continue;
        }
        if let Some(id) = dom::node_attr(node, "id") {
            let id = id.trim();
            if !id.is_empty() {
                targets.entry(id.to_string()).or_insert(node);
            }
        }
        if dom::node_tag(node).as_deref() == Some("a") {
            if let Some(name) = dom::node_attr(node, "name") {
                let name = name.trim();
                if !name.is_empty() {
                    targets.entry(name.to_string()).or_insert(node);
                }
            }
        }
    }
    targets
}

fn section_for_label(label: &str) -> Option<Section> {
    let label: String = label.trim().to_lowercase();
    let label = label.trim_end_matches(|ch: char| !ch.is_alphanumeric());
    NAV_LABELS.iter().find_map(|(rule, section)| {
        let matched = match rule {
            LabelRule::Prefix(prefix) => label.starts_with(prefix),
            LabelRule::Exact(exact) => label == *exact,
        };
        matched.then_some(*section)
    })
}

/// The node range of one section: the container holding the target plus
/// its following siblings, ending before the sibling holding the next
/// target. The last section's container is the target's ancestor directly
/// under `<body>`.
fn section_range<'a>(
    doc: &'a Document,
    target: NodeRef<'a>,
    next: Option<NodeRef<'a>>,
) -> Vec<NodeRef<'a>> {
    let container = match next {
        Some(next) => divergent_child(target, next),
        None => top_container(doc, target),
    };
    let mut nodes = vec![container];
    let mut cursor = container.next_sibling();
    while let Some(node) = cursor {
        if next.is_some_and(|next| dom::contains(node, next)) {
            break;
        }
        nodes.push(node);
        cursor = node.next_sibling();
    }
    nodes
}

/// The child of the lowest common ancestor of `target` and `next` lying
/// on `target`'s side. When `target` is an ancestor of `next` it is its
/// own container.
fn divergent_child<'a>(target: NodeRef<'a>, next: NodeRef<'a>) -> NodeRef<'a> {
    let path = dom::root_path(target);
    let next_path = dom::root_path(next);
    let mut depth = 0;
    while depth < path.len() && depth < next_path.len() && path[depth].id == next_path[depth].id {
        depth += 1;
    }
    path.get(depth).copied().unwrap_or(target)
}

fn top_container<'a>(doc: &'a Document, target: NodeRef<'a>) -> NodeRef<'a> {
    let Some(body) = dom::body(doc) else {
        return target;
    };
    let path = dom::root_path(target);
    path.iter()
        .position(|node| node.id == body.id)
        .and_then(|at| path.get(at + 1))
        .copied()
        .unwrap_or(target)
}

// =============================================================================
// General Block Mode
// =============================================================================

fn block_items(section: Section, range: &[NodeRef<'_>], options: &Options) -> Vec<Item> {
    let mut texts: Vec<RichText> = Vec::new();
    for node in collect_blocks(range, section) {
        let block = formatting::extract(node);
        if text::is_trivial(&block.plain_text(), options.min_block_chars) {
            continue;
        }
        texts.push(block);
    }
    if section == Section::MainText {
        if let Some(first) = texts.first() {
            if options.is_invocation(&first.plain_text()) {
                texts.remove(0);
            }
        }
    }
    let mut items = Vec::new();
    for mut block in texts {
        if section == Section::MainText {
            let _ = block.strip_leading_label();
        }
        if block.is_empty() {
            continue;
        }
        items.push(Item {
            ordinal: (items.len() + 1).to_string(),
            text: block,
        });
    }
    items
}

fn question_items(range: &[NodeRef<'_>], options: &Options) -> Vec<Item> {
    // Short blocks are kept: a bare number is a signal, not noise.
    collect_blocks(range, Section::Questions)
        .into_iter()
        .fold(QaMachine::new(options.min_block_chars), |machine, node| {
            machine.step(formatting::extract(node))
        })
        .finish()
}

fn collect_blocks<'a>(range: &[NodeRef<'a>], section: Section) -> Vec<NodeRef<'a>> {
    let mut blocks = Vec::new();
    for node in range {
        collect_blocks_into(*node, section, &mut blocks);
    }
    blocks
}

fn collect_blocks_into<'a>(node: NodeRef<'a>, section: Section, out: &mut Vec<NodeRef<'a>>) {
    if !node.is_element() {
        return;
    }
    if is_block_candidate(node, section) {
        out.push(node);
        return;
    }
    for child in node.children() {
        collect_blocks_into(child, section, out);
    }
}

fn is_block_candidate(node: NodeRef<'_>, section: Section) -> bool {
    let Some(tag) = dom::node_tag(node) else {
        return false;
    };
    if tag == "p" {
        return true;
    }
    if section != Section::Questions {
        return false;
    }
    (tag == "li" || QUESTION_CONTAINERS.contains(&tag.as_str())) && !has_block_descendant(node)
}

fn has_block_descendant(node: NodeRef<'_>) -> bool {
    node.descendants().into_iter().any(|descendant| {
        descendant.id != node.id
            && descendant.is_element()
            && dom::node_tag(descendant).is_some_and(|tag| BLOCK_TAGS.contains(&tag.as_str()))
    })
}

// =============================================================================
// Notes Mode
// =============================================================================

fn note_items(range: &[NodeRef<'_>]) -> Vec<Item> {
    let mut containers = Vec::new();
    for node in range {
        collect_note_containers(*node, &mut containers);
    }
    let mut items = Vec::new();
    for container in containers {
        let label = find_label(container);
        let ordinal = label
            .and_then(|label| label_ordinal(&text::normalize(&label.text())))
            .unwrap_or_else(|| (items.len() + 1).to_string());
        let text = note_text(container, label);
        if text.is_empty() {
            continue;
        }
        items.push(Item { ordinal, text });
    }
    items
}

fn collect_note_containers<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    if !node.is_element() {
        return;
    }
    if dom::class_token_contains(node, "note") {
        out.push(node);
        return;
    }
    for child in node.children() {
        collect_note_containers(child, out);
    }
}

fn find_label(container: NodeRef<'_>) -> Option<NodeRef<'_>> {
    container.descendants().into_iter().find(|descendant| {
        descendant.id != container.id
            && descendant.is_element()
            && dom::class_token_contains(*descendant, "label")
    })
}

/// Leading digits of a note label, as written.
fn label_ordinal(label: &str) -> Option<String> {
    let digits: String = label.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// A note's text: its paragraph descendants joined in order, the label
/// element excluded. A container without paragraphs carries its text
/// directly and is taken whole, minus the printed label.
fn note_text(container: NodeRef<'_>, label: Option<NodeRef<'_>>) -> RichText {
    let mut paragraphs = Vec::new();
    collect_note_paragraphs(container, label.map(|node| node.id), &mut paragraphs);
    if paragraphs.is_empty() {
        let mut whole = formatting::extract(container);
        let _ = whole.strip_leading_label();
        return whole;
    }
    let mut text = RichText::new();
    for paragraph in paragraphs {
        let mut block = formatting::extract(paragraph);
        if label.is_some_and(|label| dom::contains(paragraph, label)) {
            let _ = block.strip_leading_label();
        }
        text.append_block(block);
    }
    text
}

fn collect_note_paragraphs<'a>(node: NodeRef<'a>, skip: Option<NodeId>, out: &mut Vec<NodeRef<'a>>) {
    if skip.is_some_and(|id| node.id == id) || !node.is_element() {
        return;
    }
    if dom::node_tag(node).as_deref() == Some("p") {
        out.push(node);
        return;
    }
    for child in node.children() {
        collect_note_paragraphs(child, skip, out);
    }
}
