//! Explicit-marker segmentation.
//!
//! Books digitized with family-prefixed anchors (`preface-3`,
//! `mainText-47`) carry their structure in the markup itself. Each family
//! is scanned by counting up from one; an item's text is the range from
//! its anchor to the next cataloged anchor, wherever in the tree that is.

use tracing::debug;

use crate::anchors::AnchorCatalog;
use crate::dom::{self, NodeRef};
use crate::formatting;
use crate::model::{BookModel, Item, RichText, Section};
use crate::options::Options;

struct Family {
    prefix: &'static str,
    section: Section,
    /// Upper bound on the counting scan; generous, never reached in
    /// practice because the first gap ends the family.
    ceiling: u32,
    /// Probe lettered continuations (`introduction-12b`).
    lettered: bool,
    /// Drop the printed number repeated at the head of the item text.
    strip_label: bool,
}

const FAMILIES: &[Family] = &[
    Family { prefix: "preface", section: Section::Preface, ceiling: 50, lettered: false, strip_label: false },
    Family { prefix: "introduction", section: Section::Introduction, ceiling: 200, lettered: true, strip_label: false },
    Family { prefix: "description", section: Section::Description, ceiling: 50, lettered: false, strip_label: false },
    Family { prefix: "mainText", section: Section::MainText, ceiling: 500, lettered: false, strip_label: true },
    Family { prefix: "question", section: Section::Questions, ceiling: 300, lettered: false, strip_label: true },
    Family { prefix: "note", section: Section::Notes, ceiling: 300, lettered: false, strip_label: false },
];

/// Lettered continuations probed after each found number.
const SUFFIXES: [char; 2] = ['b', 'c'];

/// Anchors whose presence selects marker segmentation for the document.
const TRIGGERS: [&str; 3] = ["preface-1", "introduction-1", "mainText-1"];

/// Whether the catalog announces a marker-segmented book.
pub(crate) fn has_trigger(catalog: &AnchorCatalog<'_>) -> bool {
    TRIGGERS.iter().any(|name| catalog.contains(name))
}

/// Segments a marker-annotated book into its sections.
pub(crate) fn segment(catalog: &AnchorCatalog<'_>, options: &Options) -> BookModel {
    let mut model = BookModel::default();
    for family in FAMILIES {
        let items = scan_family(family, catalog, options);
        if !items.is_empty() {
            debug!(family = family.prefix, items = items.len(), "marker family scanned");
        }
        model.push(family.section, items);
    }
    model
}

fn scan_family(family: &Family, catalog: &AnchorCatalog<'_>, options: &Options) -> Vec<Item> {
    let mut items = Vec::new();
    for number in 1..=family.ceiling {
        let Some(node) = catalog.get(&format!("{}-{number}", family.prefix)) else {
            // The first missing number ends the family.
            break;
        };
        push_item(&mut items, number.to_string(), node, family, catalog);

        if family.lettered && options.expand_letter_suffixes {
            for suffix in SUFFIXES {
                let Some(node) = catalog.get(&format!("{}-{number}{suffix}", family.prefix)) else {
                    break;
                };
                push_item(&mut items, format!("{number}{suffix}"), node, family, catalog);
            }
        }
    }
    items
}

fn push_item(
    items: &mut Vec<Item>,
    ordinal: String,
    node: NodeRef<'_>,
    family: &Family,
    catalog: &AnchorCatalog<'_>,
) {
    let mut text = collect_range(node, catalog);
    if family.strip_label {
        let _ = text.strip_leading_label();
    }
    // An anchor with nothing before the next boundary yields no item.
    if text.is_empty() {
        return;
    }
    items.push(Item { ordinal, text });
}

/// Collects the text range starting at an anchor node and ending at the
/// next cataloged anchor, in document order.
///
/// Subtrees free of boundaries are taken wholesale so their formatting
/// nests correctly; a subtree holding a boundary is entered instead, and
/// the walk stops on the boundary node itself.
fn collect_range(start: NodeRef<'_>, catalog: &AnchorCatalog<'_>) -> RichText {
    let mut acc = RichText::new();
    let mut cursor = Some(start);
    let mut at_start = true;

    while let Some(node) = cursor {
        if !at_start && catalog.is_anchor_node(node.id) {
            break;
        }
        at_start = false;

        if node.is_element() && dom::subtree_contains_any(node, catalog.node_ids()) {
            cursor = dom::next_in_document_order(node);
            continue;
        }

        formatting::push_node(node, &mut acc);
        cursor = dom::next_skipping_subtree(node);
    }

    acc.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Inline, SpanKind};

    fn segment_html(html: &str) -> BookModel {
        let doc = dom::parse(html);
        let catalog = AnchorCatalog::build(&doc);
        segment(&catalog, &Options::default())
    }

    fn plain_items(model: &BookModel, section: Section) -> Vec<(String, String)> {
        model
            .items(section)
            .unwrap_or_default()
            .iter()
            .map(|item| (item.ordinal.clone(), item.text.plain_text()))
            .collect()
    }

    #[test]
    fn main_text_items_are_sliced_between_anchors() {
        let model = segment_html(
            "<body>\
             <p id='mainText-1'>1. The self is eternal.</p>\
             <p id='mainText-2'>2. It is never born.</p>\
             <p id='mainText-3'>3. Nor does it die.</p>\
             </body>",
        );
        assert_eq!(
            plain_items(&model, Section::MainText),
            vec![
                ("1".to_string(), "The self is eternal.".to_string()),
                ("2".to_string(), "It is never born.".to_string()),
                ("3".to_string(), "Nor does it die.".to_string()),
            ]
        );
    }

    #[test]
    fn a_gap_ends_the_family() {
        let model = segment_html(
            "<body>\
             <p id='mainText-1'>1. One.</p>\
             <p id='mainText-2'>2. Two.</p>\
             <p id='mainText-4'>4. Unreachable.</p>\
             </body>",
        );
        let items = plain_items(&model, Section::MainText);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].0, "2");
        // The orphan anchor still bounds the previous item's range.
        assert_eq!(items[1].1, "Two.");
    }

    #[test]
    fn empty_anchor_elements_take_the_following_text() {
        let model = segment_html(
            "<body><div>\
             <a name='preface-1'></a>In this edition the verses were checked anew.\
             <a name='preface-2'></a>The glossary follows older prints.\
             </div></body>",
        );
        assert_eq!(
            plain_items(&model, Section::Preface),
            vec![
                ("1".to_string(), "In this edition the verses were checked anew.".to_string()),
                ("2".to_string(), "The glossary follows older prints.".to_string()),
            ]
        );
    }

    #[test]
    fn a_boundary_inside_a_container_splits_it() {
        let model = segment_html(
            "<body><div id='mainText-1'>1. First words. \
             <a name='mainText-2'></a>2. Second words.</div></body>",
        );
        assert_eq!(
            plain_items(&model, Section::MainText),
            vec![
                ("1".to_string(), "First words.".to_string()),
                ("2".to_string(), "Second words.".to_string()),
            ]
        );
    }

    #[test]
    fn introduction_probes_lettered_continuations() {
        let html = "<body>\
             <p id='introduction-1'>Opening remarks.</p>\
             <p id='introduction-2'>On the commentaries.</p>\
             <p id='introduction-2b'>Further on the commentaries.</p>\
             <p id='introduction-3'>On the translation.</p>\
             </body>";
        let model = segment_html(html);
        let ordinals: Vec<_> = plain_items(&model, Section::Introduction)
            .into_iter()
            .map(|(ordinal, _)| ordinal)
            .collect();
        assert_eq!(ordinals, vec!["1", "2", "2b", "3"]);

        // With probing disabled the lettered anchor still bounds item 2.
        let doc = dom::parse(html);
        let catalog = AnchorCatalog::build(&doc);
        let options = Options {
            expand_letter_suffixes: false,
            ..Options::default()
        };
        let model = segment(&catalog, &options);
        let items = plain_items(&model, Section::Introduction);
        let ordinals: Vec<_> = items.iter().map(|(ordinal, _)| ordinal.clone()).collect();
        assert_eq!(ordinals, vec!["1", "2", "3"]);
        assert_eq!(items[1].1, "On the commentaries.");
    }

    #[test]
    fn formatting_survives_inside_an_item() {
        let model = segment_html(
            "<body>\
             <p id='mainText-1'>1. The <i>atman</i> endures.</p>\
             <p id='mainText-2'>2. Tail.</p>\
             </body>",
        );
        let items = match model.items(Section::MainText) {
            Some(items) => items,
            None => panic!("main text missing"),
        };
        assert!(items[0]
            .text
            .inlines
            .iter()
            .any(|node| matches!(node, Inline::Span { kind: SpanKind::Italic, .. })));
    }

    #[test]
    fn families_do_not_bleed_into_each_other() {
        let model = segment_html(
            "<body>\
             <p id='preface-1'>A word first.</p>\
             <p id='mainText-1'>1. The teaching.</p>\
             <p id='note-1'>1. A note on sources.</p>\
             </body>",
        );
        assert_eq!(
            plain_items(&model, Section::Preface),
            vec![("1".to_string(), "A word first.".to_string())]
        );
        assert_eq!(
            plain_items(&model, Section::MainText),
            vec![("1".to_string(), "The teaching.".to_string())]
        );
        // Note labels are kept as printed.
        assert_eq!(
            plain_items(&model, Section::Notes),
            vec![("1".to_string(), "1. A note on sources.".to_string())]
        );
    }

    #[test]
    fn trigger_detection_requires_a_family_opener() {
        let doc = dom::parse("<body><p id='mainText-1'>x</p></body>");
        assert!(has_trigger(&AnchorCatalog::build(&doc)));

        let doc = dom::parse("<body><p id='mainText-2'>x</p><p id='chapter'>y</p></body>");
        assert!(!has_trigger(&AnchorCatalog::build(&doc)));
    }
}
