// ============================================================
// Layer 4 - Whitespace Segmenter
// ============================================================
// Splits paragraph text into whitespace-delimited words and
// records, for every character, which word it belongs to.
//
// SQuAD answers are annotated as CHARACTER offsets. The
// char → word map is what lets us turn those offsets into word
// indices before sub-word tokenisation happens.
//
// Example:
//   text:         "Hi  you"
//   doc_tokens:   ["Hi", "you"]
//   char_to_word: [0, 0, 0, 0, 1, 1, 1]
//                        ^  ^ whitespace maps to the previous word
//
// Offsets count Unicode scalar values (Rust `char`s), not bytes.
// No case or Unicode normalisation is applied.

use std::sync::Arc;

/// Whitespace as understood by SQuAD annotations: space, tab,
/// CR, LF and the narrow no-break space (U+202F).
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{202F}')
}

/// Strip and split on any Unicode whitespace. Used to clean
/// answer text before comparing it with the paragraph words.
pub fn whitespace_tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// The result of segmenting one paragraph.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Maximal runs of non-whitespace characters, in order
    pub doc_tokens: Arc<[String]>,

    /// For each character offset, the index of the most recently
    /// started word. `None` only for leading whitespace.
    pub char_to_word: Vec<Option<usize>>,
}

impl Segmentation {
    /// Word index for a character offset, or `None` when the offset
    /// is past the end of the text or precedes the first word.
    pub fn word_at(&self, char_offset: usize) -> Option<usize> {
        self.char_to_word.get(char_offset).copied().flatten()
    }

    pub fn num_words(&self) -> usize {
        self.doc_tokens.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl WhitespaceSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment `text` into words plus the per-character word map.
    pub fn segment(&self, text: &str) -> Segmentation {
        let mut doc_tokens: Vec<String> = Vec::new();
        let mut char_to_word            = Vec::with_capacity(text.len());
        let mut prev_is_whitespace      = true;

        for c in text.chars() {
            if is_whitespace(c) {
                prev_is_whitespace = true;
            } else {
                match doc_tokens.last_mut() {
                    Some(word) if !prev_is_whitespace => word.push(c),
                    _ => doc_tokens.push(c.to_string()),
                }
                prev_is_whitespace = false;
            }
            char_to_word.push(doc_tokens.len().checked_sub(1));
        }

        Segmentation {
            doc_tokens: doc_tokens.into(),
            char_to_word,
        }
    }
}
