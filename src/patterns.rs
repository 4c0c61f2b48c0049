//! Compiled regex patterns for markup segmentation.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by their role in the segmentation pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Anchor Marker Patterns
// =============================================================================

/// Matches a family-prefixed anchor marker: an alphabetic family name, a
/// hyphen, a number, and an optional single-letter suffix.
///
/// Examples: `preface-3`, `mainText-47`, `introduction-12b`.
/// The pattern is anchored on both ends; ids with extra segments such as
/// `preface-3-continued` are not markers.
pub static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)-([0-9]+)([a-z])?$").expect("MARKER regex")
});

// =============================================================================
// Item Label Patterns
// =============================================================================

/// Matches the printed label at the head of an item's text: digits, an
/// optional letter, then either a separator (`12.`, `4)`, `7:`) or plain
/// whitespace.
///
/// Digitized books repeat the item number inside the text; the label is
/// redundant once the ordinal is known and gets stripped.
pub static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+[a-z]?)(?:[.):]\s*|\s+)").expect("LEADING_LABEL regex")
});

/// Matches a block that is nothing but a number, optionally followed by a
/// closing `.` or `)`.
pub static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s*[.)]?$").expect("BARE_NUMBER regex")
});

// =============================================================================
// Question/Answer Label Patterns
// =============================================================================

/// Matches a question label at the head of a block: `Question:`, `Q.`,
/// `Question 3.` and similar. Captures the inline number when present.
///
/// The trailing alternation requires either punctuation or whitespace after
/// the word so that prose starting with `Questions` does not match.
pub static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^q(?:uestion)?\s*([0-9]+[a-z]?)?\s*(?:[.:)]\s*|\s+)")
        .expect("QUESTION_LABEL regex")
});

/// Matches an answer label at the head of a block: `Answer:`, `Ans.`,
/// `Answer 3.` and similar.
pub static ANSWER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ans(?:wer)?\s*(?:[0-9]+[a-z]?)?\s*(?:[.:)]\s*|\s+)")
        .expect("ANSWER_LABEL regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches a named character entity left verbatim by the digitization
/// (typically from double-encoded source text).
pub static NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&([a-zA-Z]+);").expect("NAMED_ENTITY regex")
});

/// Matches a run of whitespace, for collapsing to a single space.
pub static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_RUN regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_matches_family_prefixed_ids() {
        assert!(MARKER.is_match("preface-3"));
        assert!(MARKER.is_match("mainText-47"));
        assert!(MARKER.is_match("introduction-12b"));
        assert!(!MARKER.is_match("preface-3-continued"));
        assert!(!MARKER.is_match("preface"));
        assert!(!MARKER.is_match("-12"));
    }

    #[test]
    fn marker_captures_family_number_and_suffix() {
        let caps = match MARKER.captures("introduction-12b") {
            Some(caps) => caps,
            None => panic!("expected a match"),
        };
        assert_eq!(&caps[1], "introduction");
        assert_eq!(&caps[2], "12");
        assert_eq!(caps.get(3).map(|m| m.as_str()), Some("b"));
    }

    #[test]
    fn leading_label_matches_common_separators() {
        assert!(LEADING_LABEL.is_match("12. The self is eternal."));
        assert!(LEADING_LABEL.is_match("4) Thus spoke the teacher."));
        assert!(LEADING_LABEL.is_match("7: On fasting."));
        assert!(LEADING_LABEL.is_match("12b. Continued."));
        assert!(LEADING_LABEL.is_match("3 The bare form."));
        assert!(!LEADING_LABEL.is_match("The 12 sages."));
    }

    #[test]
    fn bare_number_matches_only_whole_numbers() {
        assert!(BARE_NUMBER.is_match("7"));
        assert!(BARE_NUMBER.is_match("3."));
        assert!(BARE_NUMBER.is_match("4)"));
        assert!(!BARE_NUMBER.is_match("7 sages"));
        assert!(!BARE_NUMBER.is_match("chapter 7"));
    }

    #[test]
    fn question_label_matches_and_captures_number() {
        let caps = match QUESTION_LABEL.captures("Question 3: What is dharma?") {
            Some(caps) => caps,
            None => panic!("expected a match"),
        };
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("3"));

        assert!(QUESTION_LABEL.is_match("Question: What is fasting?"));
        assert!(QUESTION_LABEL.is_match("Q. What is fasting?"));
        assert!(!QUESTION_LABEL.is_match("Questions were raised."));
    }

    #[test]
    fn answer_label_matches_common_forms() {
        assert!(ANSWER_LABEL.is_match("Answer: Abstention from food."));
        assert!(ANSWER_LABEL.is_match("Ans. Abstention from food."));
        assert!(ANSWER_LABEL.is_match("ANSWER given in brief."));
        assert!(!ANSWER_LABEL.is_match("Answers were given."));
        assert!(!ANSWER_LABEL.is_match("Another point."));
    }
}
