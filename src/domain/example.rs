// ============================================================
// Layer 3 - SquadExample Domain Type
// ============================================================
// A normalised question/paragraph pair with a word-level answer
// span. This is what the example builder produces and what the
// feature transform consumes.
//
// Word indices point into `doc_tokens`, the whitespace-split
// paragraph, NOT into sub-word tokens. Projecting them into
// sub-token space is the span aligner's job.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` range of word indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSpan {
    pub start: usize,
    pub end:   usize,
}

impl WordSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadExample {
    /// External question id, copied from the record
    pub qas_id: String,

    /// Dense id assigned in record order; counts dropped records too
    pub sequence_id: usize,

    pub question_text: String,

    /// Whitespace-tokenised paragraph, shared by every question on it
    pub doc_tokens: Arc<[String]>,

    /// Empty when the question is impossible or labels were not read
    pub orig_answer_text: String,

    /// `None` when the question is impossible or labels were not read
    pub answer_span: Option<WordSpan>,

    pub is_impossible: bool,
}
