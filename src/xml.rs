//! XML serialization of the book model.
//!
//! The output keeps the model's shape: one `section` element per section
//! with its stable name, one `item` element per numbered item, inline
//! spans as nested tags. Hard line breaks become `<br/>`.

use crate::model::{BookModel, Inline, SpanKind};
use crate::Result;

/// Serializes a segmented book as an XML document string.
#[must_use]
pub fn to_xml_string(model: &BookModel) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<book>\n");
    for section in &model.sections {
        out.push_str("  <section name=\"");
        out.push_str(section.section.name());
        out.push_str("\">\n");
        for item in &section.items {
            out.push_str("    <item ordinal=\"");
            out.push_str(&escape_xml(&item.ordinal));
            out.push_str("\">");
            write_inlines(&item.text.inlines, &mut out);
            out.push_str("</item>\n");
        }
        out.push_str("  </section>\n");
    }
    out.push_str("</book>\n");
    out
}

/// Serializes a segmented book into a writer.
pub fn write_xml<W: std::io::Write>(model: &BookModel, mut writer: W) -> Result<()> {
    writer.write_all(to_xml_string(model).as_bytes())?;
    Ok(())
}

fn write_inlines(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&escape_xml(text).replace('\n', "<br/>")),
            Inline::Span { kind, children } => write_span(kind, children, out),
        }
    }
}

fn write_span(kind: &SpanKind, children: &[Inline], out: &mut String) {
    let tag = match kind {
        SpanKind::Italic => "i",
        SpanKind::Bold => "b",
        SpanKind::Underline => "u",
        SpanKind::Superscript => "sup",
        SpanKind::Subscript => "sub",
        SpanKind::Reference { target } => {
            out.push_str("<ref target=\"");
            out.push_str(&escape_xml(target));
            out.push_str("\">");
            write_inlines(children, out);
            out.push_str("</ref>");
            return;
        }
    };
    out.push('<');
    out.push_str(tag);
    out.push('>');
    write_inlines(children, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, RichText, Section, SectionItems};

    fn sample_model() -> BookModel {
        let mut text = RichText::new();
        text.push_text("The self is ");
        let mut italic = RichText::new();
        italic.push_text("eternal");
        text.push_span(SpanKind::Italic, italic);
        text.push_text(" & free.");

        BookModel {
            sections: vec![SectionItems {
                section: Section::MainText,
                items: vec![Item {
                    ordinal: "47".to_string(),
                    text,
                }],
            }],
        }
    }

    #[test]
    fn model_serializes_with_nested_spans() {
        let xml = to_xml_string(&sample_model());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<book>\n"));
        assert!(xml.contains("<section name=\"mainText\">"));
        assert!(xml.contains(
            "<item ordinal=\"47\">The self is <i>eternal</i> &amp; free.</item>"
        ));
        assert!(xml.ends_with("</book>\n"));
    }

    #[test]
    fn reference_spans_carry_their_target() {
        let mut link = RichText::new();
        link.push_text("the scan");
        let mut text = RichText::new();
        text.push_span(
            SpanKind::Reference {
                target: "http://archive.example.org/scan?p=1&q=2".to_string(),
            },
            link,
        );
        let model = BookModel {
            sections: vec![SectionItems {
                section: Section::Notes,
                items: vec![Item {
                    ordinal: "1".to_string(),
                    text,
                }],
            }],
        };
        let xml = to_xml_string(&model);
        assert!(xml.contains(
            "<ref target=\"http://archive.example.org/scan?p=1&amp;q=2\">the scan</ref>"
        ));
    }

    #[test]
    fn line_breaks_become_break_elements() {
        let mut text = RichText::new();
        text.push_text("first line");
        text.push_newline();
        text.push_text("second line");
        let model = BookModel {
            sections: vec![SectionItems {
                section: Section::Preface,
                items: vec![Item {
                    ordinal: "1".to_string(),
                    text,
                }],
            }],
        };
        assert!(to_xml_string(&model).contains("first line<br/>second line"));
    }

    #[test]
    fn empty_model_is_an_empty_book_element() {
        assert_eq!(
            to_xml_string(&BookModel::default()),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<book>\n</book>\n"
        );
    }

    #[test]
    fn writer_output_matches_the_string_form() {
        let model = sample_model();
        let mut buffer = Vec::new();
        if let Err(err) = write_xml(&model, &mut buffer) {
            panic!("writing to a Vec failed: {err:?}");
        }
        assert_eq!(String::from_utf8_lossy(&buffer), to_xml_string(&model));
    }
}
