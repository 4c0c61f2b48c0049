//! Configuration options for segmentation.
//!
//! The `Options` struct controls the few behaviors that vary between book
//! digitizations. The defaults match the common case.

/// Configuration options for segmentation.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use capitula::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     min_block_chars: 5,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Minimum number of characters a normalized text block must carry to
    /// count as content during navigation-driven segmentation. Shorter
    /// blocks are page-layout residue (stray punctuation, page numbers).
    ///
    /// Question blocks are exempt: a bare `7` can be a meaningful item
    /// number there.
    ///
    /// Default: `3`
    pub min_block_chars: usize,

    /// Opening words that mark an invocation block at the head of the main
    /// text. Many digitized scriptures open with a benediction before item
    /// one; a first block starting with one of these words (compared
    /// case-insensitively) is skipped.
    ///
    /// Default: `["om", "aum"]`
    pub invocation_prefixes: Vec<String>,

    /// Probe lettered continuation markers (`introduction-12b`,
    /// `introduction-12c`) while scanning explicit markers. Disable for
    /// books known to number continuations independently.
    ///
    /// Default: `true`
    pub expand_letter_suffixes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_block_chars: 3,
            invocation_prefixes: vec!["om".to_string(), "aum".to_string()],
            expand_letter_suffixes: true,
        }
    }
}

impl Options {
    /// Whether a block opens with one of the configured invocation words.
    #[must_use]
    pub(crate) fn is_invocation(&self, text: &str) -> bool {
        let Some(first_word) = text.split_whitespace().next() else {
            return false;
        };
        let first_word = first_word.trim_matches(|ch: char| !ch.is_alphanumeric());
        self.invocation_prefixes
            .iter()
            .any(|prefix| first_word.eq_ignore_ascii_case(prefix))
    }
}
