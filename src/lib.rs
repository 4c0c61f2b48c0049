//! # capitula
//!
//! Structural extraction for digitized legacy books.
//!
//! This library turns the crufty HTML of a digitized book into a clean
//! model of sections holding ordered, numbered items, preserving inline
//! formatting (italics, bold, references) while discarding layout noise.
//!
//! ## Quick Start
//!
//! ```rust
//! use capitula::{segment, Section};
//!
//! let html = r#"<html><body>
//! <p id="mainText-1">1. The self is eternal.</p>
//! <p id="mainText-2">2. It is never born.</p>
//! </body></html>"#;
//!
//! let model = segment(html)?;
//! let items = model.items(Section::MainText).unwrap_or_default();
//! assert_eq!(items[0].ordinal, "1");
//! assert_eq!(items[0].text.plain_text(), "The self is eternal.");
//! # Ok::<(), capitula::Error>(())
//! ```
//!
//! ## How It Works
//!
//! - **Explicit markers**: books annotated with family-prefixed anchors
//!   (`preface-3`, `introduction-12b`, `mainText-47`) are segmented by
//!   counting markers per family, each item bounded by the next anchor.
//! - **Navigation ranges**: books without markers are segmented through
//!   their table-of-contents links; paragraph blocks within each linked
//!   range become items, with a dedicated state machine untangling
//!   question/answer numbering.
//!
//! Both strategies normalize text (whitespace, stray entities, curly
//! punctuation) and never fail on malformed markup: a document with no
//! recognizable structure yields an empty model, not an error.
//!
//! ## Output
//!
//! The model serializes to JSON via [serde](https://serde.rs) and to a
//! structured XML document via [`xml::to_xml_string`].

mod anchors;
mod error;
mod model;
mod options;
mod patterns;

/// DOM adapter over `dom_query`: parsing, node helpers, document-order
/// cursor.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Inline formatting extraction from element subtrees.
pub mod formatting;

/// Strategy selection and the two segmenters.
pub mod segmenter;

/// Text normalization and label handling.
pub mod text;

/// XML serialization of the book model.
pub mod xml;

// Public API - re-exports
pub use anchors::AnchorCatalog;
pub use error::{Error, Result};
pub use model::{BookModel, Inline, Item, RichText, Section, SectionItems, SpanKind};
pub use options::Options;
pub use segmenter::{segment_document, Strategy};
pub use text::normalize;

/// Segments a book document using default options.
///
/// # Example
///
/// ```rust
/// use capitula::segment;
///
/// let html = "<html><body><p id='preface-1'>From the publisher.</p></body></html>";
/// let model = segment(html)?;
/// assert_eq!(model.item_count(), 1);
/// # Ok::<(), capitula::Error>(())
/// ```
pub fn segment(html: &str) -> Result<BookModel> {
    segment_with_options(html, &Options::default())
}

/// Segments a book document with custom options.
///
/// # Example
///
/// ```rust
/// use capitula::{segment_with_options, Options};
///
/// let html = "<html><body><p id='mainText-1'>1. Short.</p></body></html>";
/// let options = Options {
///     min_block_chars: 1,
///     ..Options::default()
/// };
/// let model = segment_with_options(html, &options)?;
/// # Ok::<(), capitula::Error>(())
/// ```
pub fn segment_with_options(html: &str, options: &Options) -> Result<BookModel> {
    let doc = dom::parse(html);
    Ok(segment_document(&doc, options))
}

/// Segments a book document from raw bytes, detecting the character
/// encoding from a BOM or `<meta>` declaration first.
///
/// Digitized books predate UTF-8 more often than not; bytes that do not
/// decode are replaced with `�` rather than failing the run.
///
/// # Example
///
/// ```rust
/// use capitula::segment_bytes;
///
/// let html = b"<html><head><meta charset=\"windows-1252\"></head>\
/// <body><p id='mainText-1'>1. Caf\xE9.</p></body></html>";
/// let model = segment_bytes(html)?;
/// # Ok::<(), capitula::Error>(())
/// ```
pub fn segment_bytes(html: &[u8]) -> Result<BookModel> {
    segment_bytes_with_options(html, &Options::default())
}

/// Segments a book document from raw bytes with custom options.
pub fn segment_bytes_with_options(html: &[u8], options: &Options) -> Result<BookModel> {
    let html = encoding::decode(html);
    segment_with_options(&html, options)
}

/// Reads, decodes and segments a book document from a file.
///
/// This is the only entry point with a genuine failure mode: the read
/// itself. Everything after the read degrades to an empty model instead
/// of erroring.
pub fn segment_file<P: AsRef<std::path::Path>>(path: P) -> Result<BookModel> {
    segment_file_with_options(path, &Options::default())
}

/// Reads, decodes and segments a book document from a file with custom
/// options.
pub fn segment_file_with_options<P: AsRef<std::path::Path>>(
    path: P,
    options: &Options,
) -> Result<BookModel> {
    let bytes = std::fs::read(path)?;
    segment_bytes_with_options(&bytes, options)
}
