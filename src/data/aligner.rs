// ============================================================
// Layer 4 - Span Aligner
// ============================================================
// Projects a word-level answer span into sub-token space and
// then looks for a tighter sub-token span that matches the
// annotated answer exactly.
//
// Why tighten?
//   Context:  "The leader was John Smith (1895-1943)."
//   Answer:   "1895"
//   The whitespace word holding the answer is "(1895-1943).",
//   but after sub-word tokenisation the document reads
//   "( 1895 - 1943 ) ." and the exact answer can be matched.
//
// This is a best-effort exact string match. When an annotator
// picked part of a word the tokenizer does not split
// ("Japan" inside "Japanese"), no sub-span matches and the
// projected span is kept as-is.

use crate::domain::error::Result;
use crate::domain::example::WordSpan;
use crate::domain::traits::SubwordTokenizer;

/// An inclusive `[start, end]` range of sub-token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end:   usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A document flattened into sub-tokens, with the maps between
/// word indices and sub-token indices.
#[derive(Debug, Clone, Default)]
pub struct SubtokenizedDoc {
    /// All sub-tokens of the document, in order
    pub tokens: Vec<String>,

    /// Sub-token index → word index it came from
    pub tok_to_orig: Vec<usize>,

    /// Word index → index of its first sub-token. A word that
    /// tokenises to nothing points at the next word's first sub-token.
    pub orig_to_tok: Vec<usize>,
}

impl SubtokenizedDoc {
    /// Tokenise every word of `doc_tokens` independently.
    pub fn build(doc_tokens: &[String], tokenizer: &dyn SubwordTokenizer) -> Result<Self> {
        let mut doc = Self::default();
        for (i, word) in doc_tokens.iter().enumerate() {
            doc.orig_to_tok.push(doc.tokens.len());
            for sub_token in tokenizer.tokenize(word)? {
                doc.tok_to_orig.push(i);
                doc.tokens.push(sub_token);
            }
        }
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Project a word span onto sub-tokens: from the first sub-token
    /// of the start word to the sub-token just before the word after
    /// `end` (or the last sub-token when `end` is the last word).
    ///
    /// Returns `None` when the projection is empty, which happens when
    /// the answer words produced no sub-tokens at all.
    pub fn project(&self, span: WordSpan) -> Option<TokenSpan> {
        let start = *self.orig_to_tok.get(span.start)?;
        let end = match self.orig_to_tok.get(span.end + 1) {
            Some(&next_word_start) => next_word_start.checked_sub(1)?,
            None => self.tokens.len().checked_sub(1)?,
        };
        (start <= end && end < self.tokens.len()).then(|| TokenSpan::new(start, end))
    }
}

/// Return the first sub-span of `[input_start, input_end]` whose
/// sub-tokens, joined by spaces, equal the tokenised answer text.
///
/// Search order: start ascending, and for each start, end descending,
/// so the widest match at the earliest start wins.
pub fn improve_answer_span(
    doc_tokens:       &[String],
    input:            TokenSpan,
    tokenizer:        &dyn SubwordTokenizer,
    orig_answer_text: &str,
) -> Result<TokenSpan> {
    let tok_answer_text = tokenizer.tokenize(orig_answer_text)?.join(" ");

    for new_start in input.start..=input.end {
        for new_end in (new_start..=input.end).rev() {
            let text_span = doc_tokens[new_start..=new_end].join(" ");
            if text_span == tok_answer_text {
                return Ok(TokenSpan::new(new_start, new_end));
            }
        }
    }

    Ok(input)
}

/// Project and refine an answer in one step.
pub fn align_answer(
    doc:         &SubtokenizedDoc,
    span:        WordSpan,
    tokenizer:   &dyn SubwordTokenizer,
    answer_text: &str,
) -> Result<Option<TokenSpan>> {
    match doc.project(span) {
        Some(projected) => {
            improve_answer_span(&doc.tokens, projected, tokenizer, answer_text).map(Some)
        }
        None => Ok(None),
    }
}
