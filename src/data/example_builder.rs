// ============================================================
// Layer 4 - Example Builder
// ============================================================
// Turns flattened SQuAD records into SquadExamples with a
// word-level answer span.
//
// For each record:
//   1. Segment the paragraph (once per paragraph, cached)
//   2. In label mode, map the character answer span to words:
//        start_word = char_to_word[answer_start]
//        end_word   = char_to_word[answer_start + len(answer) - 1]
//   3. Check the answer is recoverable: the words joined with
//      single spaces must contain the whitespace-normalised answer
//
// Step 3 can fail on odd Unicode in the source data. Such
// examples are dropped with a warning, so not every record is
// guaranteed to produce an example in label mode.
//
// sequence_id counts every input record, kept or dropped, so an
// example's id always points back at its position in the file.

use std::sync::Arc;

use crate::data::segmenter::{whitespace_tokenize, Segmentation, WhitespaceSegmenter};
use crate::domain::config::FeatureConfig;
use crate::domain::error::{Result, SquadError};
use crate::domain::example::{SquadExample, WordSpan};
use crate::domain::record::SquadRecord;

/// Outcome of building examples from a batch of records.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub examples: Vec<SquadExample>,

    /// Number of input records, including dropped ones
    pub records_seen: usize,

    /// Records whose answer could not be recovered from the paragraph
    pub dropped: usize,
}

pub struct ExampleBuilder {
    segmenter:        WhitespaceSegmenter,
    is_training:      bool,
    allow_impossible: bool,
}

impl ExampleBuilder {
    pub fn new(is_training: bool, allow_impossible: bool) -> Self {
        Self {
            segmenter: WhitespaceSegmenter::new(),
            is_training,
            allow_impossible,
        }
    }

    pub fn from_config(cfg: &FeatureConfig) -> Self {
        Self::new(cfg.is_training, cfg.allow_impossible)
    }

    /// Build examples for all records, in order.
    ///
    /// # Errors
    /// `MalformedAnswerCount` when a possible question in label mode
    /// does not have exactly one answer.
    pub fn build(&self, records: &[SquadRecord]) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        // (paragraph_index, segmentation) of the last paragraph seen
        let mut cache: Option<(usize, Arc<Segmentation>)> = None;

        for (sequence_id, record) in records.iter().enumerate() {
            let segmentation = match &cache {
                Some((index, seg)) if *index == record.paragraph_index => Arc::clone(seg),
                _ => {
                    let seg = Arc::new(self.segmenter.segment(&record.context));
                    tracing::trace!(
                        "Paragraph {} has {} words",
                        record.paragraph_index,
                        seg.num_words()
                    );
                    cache = Some((record.paragraph_index, Arc::clone(&seg)));
                    seg
                }
            };

            report.records_seen += 1;
            match self.build_one(record, sequence_id, &segmentation)? {
                Some(example) => report.examples.push(example),
                None => report.dropped += 1,
            }
        }

        tracing::debug!(
            "Built {} examples from {} records ({} dropped)",
            report.examples.len(),
            report.records_seen,
            report.dropped
        );
        Ok(report)
    }

    /// Build a single example. Returns `Ok(None)` when the answer
    /// cannot be recovered and the record is dropped.
    pub fn build_one(
        &self,
        record:       &SquadRecord,
        sequence_id:  usize,
        segmentation: &Segmentation,
    ) -> Result<Option<SquadExample>> {
        let mut example = SquadExample {
            qas_id:           record.qas_id.clone(),
            sequence_id,
            question_text:    record.question.clone(),
            doc_tokens:       Arc::clone(&segmentation.doc_tokens),
            orig_answer_text: String::new(),
            answer_span:      None,
            is_impossible:    false,
        };

        if !self.is_training {
            return Ok(Some(example));
        }

        example.is_impossible = self.allow_impossible && record.is_impossible;
        if example.is_impossible {
            return Ok(Some(example));
        }

        if record.answers.len() != 1 {
            return Err(SquadError::MalformedAnswerCount {
                qas_id: record.qas_id.clone(),
                count:  record.answers.len(),
            });
        }

        let answer = &record.answers[0];
        match locate_answer(segmentation, &answer.text, answer.answer_start) {
            Some(span) => {
                example.orig_answer_text = answer.text.clone();
                example.answer_span      = Some(span);
                Ok(Some(example))
            }
            None => Ok(None),
        }
    }
}

/// Map a character-offset answer onto a word span, or `None` when
/// the paragraph words do not contain the answer text.
fn locate_answer(seg: &Segmentation, answer_text: &str, answer_start: usize) -> Option<WordSpan> {
    let answer_len = answer_text.chars().count();
    let cleaned    = whitespace_tokenize(answer_text).join(" ");

    let span = match answer_len.checked_sub(1) {
        Some(last) => match (seg.word_at(answer_start), seg.word_at(answer_start + last)) {
            (Some(start), Some(end)) if start <= end => Some(WordSpan::new(start, end)),
            _ => None,
        },
        None => None,
    };

    let Some(span) = span else {
        tracing::warn!(
            "Could not map answer '{}' at char {} onto the paragraph",
            cleaned,
            answer_start
        );
        return None;
    };

    let actual_text = seg.doc_tokens[span.start..=span.end].join(" ");
    // a whitespace-only answer cleans to "" and is kept
    if !actual_text.contains(&cleaned) {
        tracing::warn!("Could not find answer: {} vs. {}", actual_text, cleaned);
        return None;
    }
    Some(span)
}
