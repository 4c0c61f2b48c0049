//! Document segmentation.
//!
//! Two recovery strategies cover the digitized corpus: books annotated
//! with explicit marker anchors, and books whose only structure is a
//! navigation block. The strategy is decided once per document from the
//! anchor catalog, then runs to completion on its own.

mod markers;
mod navigation;
mod qa;

use tracing::debug;

use crate::anchors::AnchorCatalog;
use crate::dom::Document;
use crate::model::BookModel;
use crate::options::Options;

/// How a document's structure is recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Family-prefixed marker anchors number every item directly.
    ExplicitMarker,
    /// A navigation block locates the sections; items are cut from
    /// paragraph blocks within each section's range.
    NavigationRange,
}

impl Strategy {
    /// Picks the strategy for a document. Marker anchors always win; a
    /// navigation block present in the same document is then ignored.
    #[must_use]
    pub fn select(catalog: &AnchorCatalog<'_>) -> Self {
        if markers::has_trigger(catalog) {
            Strategy::ExplicitMarker
        } else {
            Strategy::NavigationRange
        }
    }
}

/// Segments a parsed document into the book model.
#[must_use]
pub fn segment_document(doc: &Document, options: &Options) -> BookModel {
    let catalog = AnchorCatalog::build(doc);
    let strategy = Strategy::select(&catalog);
    debug!(?strategy, anchors = catalog.len(), "strategy selected");
    match strategy {
        Strategy::ExplicitMarker => markers::segment(&catalog, options),
        Strategy::NavigationRange => navigation::segment(doc, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::model::Section;

    #[test]
    fn marker_anchors_win_over_a_navigation_block() {
        let doc = dom::parse(
            "<body>\
             <div><a href='#text'>Text</a></div>\
             <a name='text'></a>\
             <p id='mainText-1'>1. Numbered by marker.</p>\
             </body>",
        );
        let catalog = AnchorCatalog::build(&doc);
        assert_eq!(Strategy::select(&catalog), Strategy::ExplicitMarker);

        let model = segment_document(&doc, &Options::default());
        let items = model.items(Section::MainText).unwrap_or_default();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text.plain_text(), "Numbered by marker.");
    }

    #[test]
    fn navigation_is_the_fallback_strategy() {
        let doc = dom::parse(
            "<body><a href='#preface'>Preface</a>\
             <div><a name='preface'></a><p>From the publisher.</p></div></body>",
        );
        assert_eq!(
            Strategy::select(&AnchorCatalog::build(&doc)),
            Strategy::NavigationRange
        );
    }

    #[test]
    fn a_document_with_no_structure_yields_an_empty_model() {
        let doc = dom::parse("<body><p>Plain prose, no anchors, no links.</p></body>");
        let model = segment_document(&doc, &Options::default());
        assert!(model.is_empty());
    }
}
