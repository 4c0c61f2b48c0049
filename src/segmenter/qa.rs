//! Question/answer disambiguation.
//!
//! Question sections interleave four kinds of blocks: bare item numbers,
//! labeled questions, labeled answers and unlabeled continuations. The
//! printed number does not always sit in the same block as its question,
//! so the fold below carries a queue of announced numbers and pairs them
//! up as the content arrives.
//!
//! The machine is a plain fold: `step` consumes the state and returns the
//! next one, `finish` flushes whatever is still open.

use std::collections::VecDeque;

use crate::model::{Item, RichText};
use crate::patterns::{ANSWER_LABEL, QUESTION_LABEL};
use crate::text;

/// Fold state for a question section.
///
/// Blocks must arrive normalized (no leading or trailing whitespace in
/// their plain text), which is what the segmenters produce.
#[derive(Debug)]
pub struct QaMachine {
    min_block_chars: usize,
    /// Numbers announced by bare-number blocks, waiting for their content.
    pending: VecDeque<String>,
    open: Option<OpenItem>,
    /// Numeric part of the most recently assigned ordinal.
    last_number: u32,
    items: Vec<Item>,
}

#[derive(Debug)]
struct OpenItem {
    ordinal: String,
    text: RichText,
}

impl QaMachine {
    #[must_use]
    pub fn new(min_block_chars: usize) -> Self {
        Self {
            min_block_chars,
            pending: VecDeque::new(),
            open: None,
            last_number: 0,
            items: Vec::new(),
        }
    }

    /// Advances the machine by one block.
    #[must_use]
    pub fn step(mut self, block: RichText) -> Self {
        let plain = block.plain_text();
        if plain.trim().is_empty() {
            return self;
        }

        // A block that is nothing but a number announces the next item.
        if let Some(number) = text::bare_number(&plain) {
            self.pending.push_back(number.to_string());
            return self;
        }

        if let Some(caps) = QUESTION_LABEL.captures(&plain) {
            let label_end = caps.get(0).map_or(0, |m| m.end());
            let inline = caps.get(1).map(|m| m.as_str().to_string());
            let mut rest = block;
            rest.strip_plain_prefix(label_end);
            // The numeral can also be printed after the label itself:
            // "Question: 3. What is ...".
            let inline = inline.or_else(|| rest.strip_leading_label());

            self.flush();
            let ordinal = self.choose_ordinal(inline);
            self.open = Some(OpenItem { ordinal, text: rest });
            return self;
        }

        if let Some(label) = ANSWER_LABEL.find(&plain) {
            let mut rest = block;
            rest.strip_plain_prefix(label.end());
            if let Some(open) = self.open.as_mut() {
                open.text.append_block(rest);
            } else {
                // An answer with nothing open still carries the item's
                // content; start the item it belongs to.
                self.start_unlabeled(rest);
            }
            return self;
        }

        // Unlabeled content. Fragments below the content threshold are
        // layout residue; they are dropped without touching the queue so
        // that announced numbers survive to the drain.
        if text::is_trivial(&plain, self.min_block_chars) {
            return self;
        }

        if self.open.is_some() && self.pending.is_empty() {
            if let Some(open) = self.open.as_mut() {
                open.text.append_block(block);
            }
        } else {
            // Either nothing is open, or an announced number is waiting:
            // this block begins the next item.
            self.flush();
            self.start_unlabeled(block);
        }
        self
    }

    /// Flushes the open item and emits one empty placeholder for every
    /// announced number that never received content.
    #[must_use]
    pub fn finish(mut self) -> Vec<Item> {
        self.flush();
        while let Some(number) = self.pending.pop_front() {
            if self.items.iter().any(|item| item.ordinal == number) {
                continue;
            }
            self.items.push(Item {
                ordinal: number,
                text: RichText::new(),
            });
        }
        self.items
    }

    fn start_unlabeled(&mut self, mut block: RichText) {
        let inline = block.strip_leading_label();
        let ordinal = self.choose_ordinal(inline);
        self.open = Some(OpenItem { ordinal, text: block });
    }

    /// Picks the ordinal for a new item: an inline numeral wins over the
    /// head of the queue, which wins over counting on from the last one.
    fn choose_ordinal(&mut self, inline: Option<String>) -> String {
        let ordinal = match inline {
            Some(number) => number,
            None => match self.pending.pop_front() {
                Some(number) => number,
                None => (self.last_number + 1).to_string(),
            },
        };
        // The same number may also have been announced by a bare block;
        // drop it so the drain does not emit a duplicate placeholder.
        if self.pending.front().map(String::as_str) == Some(ordinal.as_str()) {
            self.pending.pop_front();
        }
        if let Some(number) = leading_digits(&ordinal) {
            self.last_number = number;
        }
        ordinal
    }

    fn flush(&mut self) {
        if let Some(open) = self.open.take() {
            if !open.text.is_empty() {
                self.items.push(Item {
                    ordinal: open.ordinal,
                    text: open.text,
                });
            }
        }
    }
}

fn leading_digits(ordinal: &str) -> Option<u32> {
    let digits: String = ordinal.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> RichText {
        let mut rich = RichText::new();
        rich.push_text(text);
        rich
    }

    fn run(blocks: &[&str]) -> Vec<Item> {
        blocks
            .iter()
            .fold(QaMachine::new(3), |machine, text| machine.step(block(text)))
            .finish()
    }

    fn plain(items: &[Item]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|item| (item.ordinal.clone(), item.text.plain_text()))
            .collect()
    }

    #[test]
    fn labeled_pair_without_numbers_starts_at_one() {
        let items = run(&["Question: What is fasting?", "Answer: Abstention from food."]);
        assert_eq!(
            plain(&items),
            vec![("1".to_string(), "What is fasting? Abstention from food.".to_string())]
        );
    }

    #[test]
    fn bare_number_announces_the_following_question() {
        let items = run(&["7", "Question: What is fasting?", "Answer: Abstention from food."]);
        assert_eq!(
            plain(&items),
            vec![("7".to_string(), "What is fasting? Abstention from food.".to_string())]
        );
    }

    #[test]
    fn unconsumed_numbers_drain_to_empty_placeholders() {
        let items = run(&["3.", "4.", "Question: A question.", "Answer: Brief."]);
        assert_eq!(
            plain(&items),
            vec![
                ("3".to_string(), "A question. Brief.".to_string()),
                ("4".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn inline_numeral_beats_disagreeing_queue() {
        let items = run(&["3.", "Question 5: Printed number wins.", "Answer: Yes."]);
        assert_eq!(
            plain(&items),
            vec![
                ("5".to_string(), "Printed number wins. Yes.".to_string()),
                ("3".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn numeral_after_the_label_is_still_inline() {
        let items = run(&["Question: 9. Late numeral.", "Answer: Noted."]);
        assert_eq!(
            plain(&items),
            vec![("9".to_string(), "Late numeral. Noted.".to_string())]
        );
    }

    #[test]
    fn matching_bare_number_is_not_counted_twice() {
        let items = run(&["7", "Question 7: Same number twice.", "Answer: Once."]);
        assert_eq!(
            plain(&items),
            vec![("7".to_string(), "Same number twice. Once.".to_string())]
        );
    }

    #[test]
    fn unlabeled_books_split_on_announced_numbers() {
        let items = run(&[
            "3.",
            "What is fasting?",
            "Answer: Abstention.",
            "4.",
            "How long should one fast?",
        ]);
        assert_eq!(
            plain(&items),
            vec![
                ("3".to_string(), "What is fasting? Abstention.".to_string()),
                ("4".to_string(), "How long should one fast?".to_string()),
            ]
        );
    }

    #[test]
    fn continuations_append_to_the_open_item() {
        let items = run(&[
            "Question: What is the goal?",
            "The scriptures differ on this.",
            "Answer: Liberation.",
        ]);
        assert_eq!(
            plain(&items),
            vec![(
                "1".to_string(),
                "What is the goal? The scriptures differ on this. Liberation.".to_string()
            )]
        );
    }

    #[test]
    fn answer_without_an_open_item_starts_one() {
        let items = run(&["Answer: An orphan answer."]);
        assert_eq!(plain(&items), vec![("1".to_string(), "An orphan answer.".to_string())]);
    }

    #[test]
    fn noise_neither_consumes_the_queue_nor_opens_items() {
        let items = run(&["9.", "*", "Question: Still nine?", "Answer: Yes."]);
        assert_eq!(
            plain(&items),
            vec![("9".to_string(), "Still nine? Yes.".to_string())]
        );
    }

    #[test]
    fn implicit_numbering_counts_on_from_the_last_ordinal() {
        let items = run(&[
            "6",
            "Question: Sixth.",
            "Answer: Yes.",
            "Question: And after it?",
            "Answer: Seventh.",
        ]);
        assert_eq!(
            plain(&items),
            vec![
                ("6".to_string(), "Sixth. Yes.".to_string()),
                ("7".to_string(), "And after it? Seventh.".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_items() {
        assert!(run(&[]).is_empty());
        assert!(run(&["", "  "]).is_empty());
    }
}
