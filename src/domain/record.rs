// ============================================================
// Layer 3 - SquadRecord Domain Type
// ============================================================
// One flattened question record as handed over by a reader.
//
// A SQuAD file nests questions under paragraphs. Readers flatten
// that tree so the rest of the pipeline sees one record per
// question, in file order. Records of the same paragraph share
// the paragraph text through an Arc and carry the same
// paragraph_index, which the example builder uses to segment
// each paragraph only once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single annotated answer: its text and the character offset
/// (in Unicode scalar values) where it starts in the paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub text: String,
    pub answer_start: usize,
}

impl RawAnswer {
    pub fn new(text: impl Into<String>, answer_start: usize) -> Self {
        Self {
            text: text.into(),
            answer_start,
        }
    }
}

/// One question against one paragraph, before any tokenisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadRecord {
    /// Ordinal of the paragraph within the source file
    pub paragraph_index: usize,

    /// The paragraph text, shared between all its questions
    pub context: Arc<str>,

    pub question: String,

    /// External question id from the dataset (e.g. "56be4db0acb8001400a502ec")
    pub qas_id: String,

    pub answers: Vec<RawAnswer>,

    /// Only meaningful for SQuAD 2.0 style data
    pub is_impossible: bool,
}

impl SquadRecord {
    pub fn new(
        paragraph_index: usize,
        context:         Arc<str>,
        question:        impl Into<String>,
        qas_id:          impl Into<String>,
        answers:         Vec<RawAnswer>,
        is_impossible:   bool,
    ) -> Self {
        Self {
            paragraph_index,
            context,
            question: question.into(),
            qas_id:   qas_id.into(),
            answers,
            is_impossible,
        }
    }
}
