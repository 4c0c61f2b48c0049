//! The normalized book model produced by segmentation.
//!
//! A digitized book reduces to a sequence of sections, each holding an
//! ordered list of numbered items. Item text keeps its inline formatting as
//! a tree of spans rather than flattened markup.

use serde::Serialize;

use crate::patterns::LEADING_LABEL;

/// The canonical sections a digitized book can contain, in no particular
/// order; document order is whatever the source markup yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Preface,
    Introduction,
    Description,
    MainText,
    Supplementary,
    Questions,
    Synopsis,
    Notes,
    Glossary,
    KeyPassages,
}

impl Section {
    /// Stable lowerCamel name, identical to the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Section::Preface => "preface",
            Section::Introduction => "introduction",
            Section::Description => "description",
            Section::MainText => "mainText",
            Section::Supplementary => "supplementary",
            Section::Questions => "questions",
            Section::Synopsis => "synopsis",
            Section::Notes => "notes",
            Section::Glossary => "glossary",
            Section::KeyPassages => "keyPassages",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of an inline formatting span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpanKind {
    Italic,
    Bold,
    Underline,
    Superscript,
    Subscript,
    /// A link out of the book, with its absolute target URL. Internal
    /// cross-reference links are unwrapped instead of producing a span.
    Reference { target: String },
}

/// One node of item text: either a literal run or a formatted span with
/// nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Inline {
    Text(String),
    Span { kind: SpanKind, children: Vec<Inline> },
}

impl Inline {
    fn is_blank(&self) -> bool {
        match self {
            Inline::Text(text) => text.trim().is_empty(),
            Inline::Span { children, .. } => children.iter().all(Inline::is_blank),
        }
    }
}

/// Item text with inline formatting preserved.
///
/// The concatenation of all `Text` runs, in order, is the item's plain
/// text; spans only add formatting on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText {
    pub inlines: Vec<Inline>,
}

impl RichText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the text contains no visible characters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inlines.iter().all(Inline::is_blank)
    }

    /// Appends a literal run, merging into a trailing `Text` node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        push_text_node(&mut self.inlines, text);
    }

    /// Appends a hard line break (from an explicit `<br>`).
    pub fn push_newline(&mut self) {
        push_text_node(&mut self.inlines, "\n");
    }

    /// Appends a formatted span. Spans with no visible content are dropped.
    pub fn push_span(&mut self, kind: SpanKind, children: RichText) {
        if children.is_empty() {
            return;
        }
        self.inlines.push(Inline::Span {
            kind,
            children: children.inlines,
        });
    }

    /// Plain text of the item: every literal run concatenated in order,
    /// span structure ignored.
    #[must_use]
    pub fn plain_text(&self) -> String {
        fn collect(nodes: &[Inline], out: &mut String) {
            for node in nodes {
                match node {
                    Inline::Text(text) => out.push_str(text),
                    Inline::Span { children, .. } => collect(children, out),
                }
            }
        }
        let mut out = String::new();
        collect(&self.inlines, &mut out);
        out
    }

    /// Normalizes spacing across node boundaries: whitespace runs collapse
    /// to a single space (a run containing a line break collapses to a
    /// single newline), leading and trailing whitespace disappears, blank
    /// nodes are dropped and adjacent literal runs merge.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut state = Spacing {
            emitted: false,
            last_blank: false,
            pending: Pending::None,
        };
        let mut inlines = rebuild(self.inlines, &mut state);
        trim_tail(&mut inlines);
        Self { inlines }
    }

    /// Removes the printed numeric label from the head of the text,
    /// descending into a leading span if the label is formatted. Returns
    /// the label's number when one was removed.
    pub fn strip_leading_label(&mut self) -> Option<String> {
        let label = strip_label_nodes(&mut self.inlines)?;
        trim_head(&mut self.inlines);
        Some(label)
    }

    /// Removes the first `len` bytes of the plain text, splitting literal
    /// runs and dropping spans that end up empty. `len` must fall on a
    /// character boundary of the plain text, which holds for any regex
    /// match offset computed on it.
    pub(crate) fn strip_plain_prefix(&mut self, len: usize) {
        fn strip(nodes: &mut Vec<Inline>, remaining: &mut usize) {
            while *remaining > 0 {
                let Some(first) = nodes.first_mut() else {
                    return;
                };
                match first {
                    Inline::Text(text) => {
                        if text.len() <= *remaining {
                            *remaining -= text.len();
                            nodes.remove(0);
                        } else {
                            *text = text[*remaining..].to_string();
                            *remaining = 0;
                        }
                    }
                    Inline::Span { children, .. } => {
                        strip(children, remaining);
                        if children.is_empty() {
                            nodes.remove(0);
                        }
                    }
                }
            }
        }
        let mut remaining = len;
        strip(&mut self.inlines, &mut remaining);
        trim_head(&mut self.inlines);
    }

    /// Appends another normalized fragment, separated by a single space.
    pub(crate) fn append_block(&mut self, other: RichText) {
        if other.is_empty() {
            return;
        }
        if !self.is_empty() {
            self.push_text(" ");
        }
        for node in other.inlines {
            match node {
                Inline::Text(text) => push_text_node(&mut self.inlines, &text),
                span @ Inline::Span { .. } => self.inlines.push(span),
            }
        }
    }
}

/// One numbered item of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// The item's number within its section, kept as written (`"47"`,
    /// `"12b"`). Not necessarily contiguous.
    pub ordinal: String,

    /// The item's text with inline formatting.
    pub text: RichText,
}

/// A section together with its items, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionItems {
    pub section: Section,
    pub items: Vec<Item>,
}

/// The whole segmented book: sections in document order, each with its
/// ordered items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookModel {
    pub sections: Vec<SectionItems>,
}

impl BookModel {
    /// Whether segmentation produced no items at all. Callers use this to
    /// tell a structureless source from a segmented one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.items.is_empty())
    }

    /// Total number of items across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    /// The items of a section, if the book has it.
    #[must_use]
    pub fn items(&self, section: Section) -> Option<&[Item]> {
        self.sections
            .iter()
            .find(|entry| entry.section == section)
            .map(|entry| entry.items.as_slice())
    }

    /// Adds a section unless it came out empty.
    pub(crate) fn push(&mut self, section: Section, items: Vec<Item>) {
        if !items.is_empty() {
            self.sections.push(SectionItems { section, items });
        }
    }
}

fn push_text_node(nodes: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Inline::Text(text.to_string()));
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Pending {
    None,
    Space,
    Newline,
}

struct Spacing {
    /// A visible character has been emitted somewhere before this point.
    emitted: bool,
    /// The last emitted character was a separator (space or newline).
    last_blank: bool,
    pending: Pending,
}

/// Rebuilds the node list with spacing state carried across node and span
/// boundaries, in the same pending-separator style used for flattened text
/// output. Separators are only emitted in front of a visible character, so
/// runs collapse and trailing whitespace never materializes.
fn rebuild(nodes: Vec<Inline>, state: &mut Spacing) -> Vec<Inline> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Inline::Text(text) => {
                let mut buf = String::new();
                for ch in text.chars() {
                    if ch == '\n' {
                        if state.emitted && !state.last_blank {
                            state.pending = Pending::Newline;
                        }
                    } else if ch.is_whitespace() {
                        if state.emitted && !state.last_blank && state.pending == Pending::None {
                            state.pending = Pending::Space;
                        }
                    } else {
                        match state.pending {
                            Pending::Space => buf.push(' '),
                            Pending::Newline => buf.push('\n'),
                            Pending::None => {}
                        }
                        state.pending = Pending::None;
                        buf.push(ch);
                        state.emitted = true;
                        state.last_blank = false;
                    }
                }
                if !buf.is_empty() {
                    push_text_node(&mut out, &buf);
                }
            }
            Inline::Span { kind, children } => {
                // The separator belongs outside the span, not inside its
                // first child.
                if state.emitted && !state.last_blank && state.pending != Pending::None {
                    let sep = if state.pending == Pending::Newline { "\n" } else { " " };
                    push_text_node(&mut out, sep);
                    state.pending = Pending::None;
                    state.last_blank = true;
                }
                let children = rebuild(children, state);
                if !children.is_empty() {
                    out.push(Inline::Span { kind, children });
                }
            }
        }
    }
    out
}

/// Drops trailing whitespace left behind when a separator was emitted in
/// front of a span that then collapsed to nothing.
fn trim_tail(nodes: &mut Vec<Inline>) {
    while let Some(last) = nodes.last_mut() {
        match last {
            Inline::Text(text) => {
                let trimmed = text.trim_end();
                if trimmed.is_empty() {
                    nodes.pop();
                } else {
                    if trimmed.len() != text.len() {
                        *text = trimmed.to_string();
                    }
                    break;
                }
            }
            Inline::Span { children, .. } => {
                trim_tail(children);
                if children.is_empty() {
                    nodes.pop();
                } else {
                    break;
                }
            }
        }
    }
}

fn trim_head(nodes: &mut Vec<Inline>) {
    while let Some(first) = nodes.first_mut() {
        match first {
            Inline::Text(text) => {
                let trimmed = text.trim_start();
                if trimmed.is_empty() {
                    nodes.remove(0);
                } else {
                    if trimmed.len() != text.len() {
                        *text = trimmed.to_string();
                    }
                    break;
                }
            }
            Inline::Span { children, .. } => {
                trim_head(children);
                if children.is_empty() {
                    nodes.remove(0);
                } else {
                    break;
                }
            }
        }
    }
}

fn strip_label_nodes(nodes: &mut Vec<Inline>) -> Option<String> {
    loop {
        match nodes.first_mut() {
            None => return None,
            Some(Inline::Text(text)) => {
                if text.trim().is_empty() {
                    nodes.remove(0);
                    continue;
                }
                let caps = LEADING_LABEL.captures(text)?;
                let label = caps[1].to_string();
                let rest = text[caps[0].len()..].to_string();
                if rest.trim().is_empty() {
                    nodes.remove(0);
                } else {
                    *text = rest;
                }
                return Some(label);
            }
            Some(Inline::Span { children, .. }) => {
                let label = strip_label_nodes(children)?;
                if children.iter().all(Inline::is_blank) {
                    nodes.remove(0);
                }
                return Some(label);
            }
        }
    }
}
