// ============================================================
// Layer 4 - Feature Assembler
// ============================================================
// The per-example transform: one SquadExample in, one
// SquadFeature per document window out.
//
//   question ──tokenize──► query tokens (truncated)
//   doc words ─tokenize──► sub-tokens ──► aligned answer span
//                              │
//                              ▼
//                      WindowSplitter ──► windows
//                              │
//                              ▼
//   [CLS] query [SEP] window [SEP] [PAD]...   per window
//
// A FeatureTransform is immutable once built. It is shared by
// reference across worker threads; nothing in here does I/O.

use std::sync::Arc;

use crate::data::aligner::{align_answer, SubtokenizedDoc, TokenSpan};
use crate::data::window::{is_max_context, DocWindow, WindowSplitter};
use crate::domain::config::FeatureConfig;
use crate::domain::error::{Result, SquadError};
use crate::domain::example::SquadExample;
use crate::domain::feature::SquadFeature;
use crate::domain::traits::SubwordTokenizer;

pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";

pub struct FeatureTransform {
    tokenizer: Arc<dyn SubwordTokenizer>,
    config:    FeatureConfig,
}

impl FeatureTransform {
    /// Build a transform, validating the configuration up front.
    pub fn new(tokenizer: Arc<dyn SubwordTokenizer>, config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { tokenizer, config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Produce the ordered features for one example. An empty
    /// document yields no features.
    pub fn transform(&self, example: &SquadExample) -> Result<Vec<SquadFeature>> {
        let tokenizer = self.tokenizer.as_ref();

        let mut query_tokens = tokenizer.tokenize(&example.question_text)?;
        query_tokens.truncate(self.config.max_query_length);

        let doc = SubtokenizedDoc::build(&example.doc_tokens, tokenizer)?;

        let answer = match example.answer_span {
            Some(span) if self.config.is_training && !example.is_impossible => {
                align_answer(&doc, span, tokenizer, &example.orig_answer_text)?
            }
            _ => None,
        };

        let splitter = WindowSplitter::for_query(
            self.config.max_seq_length,
            query_tokens.len(),
            self.config.doc_stride,
        )?;
        let windows = splitter.split(doc.len());

        tracing::trace!(
            "Example {} ({}): {} sub-tokens, {} windows of up to {}",
            example.sequence_id,
            example.qas_id,
            doc.len(),
            windows.len(),
            splitter.max_tokens_for_doc()
        );

        (0..windows.len())
            .map(|index| self.assemble(example, &query_tokens, &doc, &windows, index, answer))
            .collect()
    }

    /// Build the feature for `windows[window_index]`.
    fn assemble(
        &self,
        example:      &SquadExample,
        query_tokens: &[String],
        doc:          &SubtokenizedDoc,
        windows:      &[DocWindow],
        window_index: usize,
        answer:       Option<TokenSpan>,
    ) -> Result<SquadFeature> {
        let window = windows[window_index];
        let seq_len = query_tokens.len() + window.length + 3;

        let mut tokens               = Vec::with_capacity(seq_len);
        let mut segment_ids          = Vec::with_capacity(self.config.max_seq_length);
        let mut token_to_orig_map    = Vec::with_capacity(seq_len);
        let mut token_is_max_context = Vec::with_capacity(seq_len);

        // ── Segment 0: [CLS] query [SEP] ─────────────────────────────────────
        tokens.push(CLS_TOKEN.to_string());
        tokens.extend(query_tokens.iter().cloned());
        tokens.push(SEP_TOKEN.to_string());
        segment_ids.resize(tokens.len(), 0);
        token_to_orig_map.resize(tokens.len(), None);
        token_is_max_context.resize(tokens.len(), None);

        // ── Segment 1: window tokens [SEP] ────────────────────────────────────
        for split_token_index in window.start..=window.end() {
            tokens.push(doc.tokens[split_token_index].clone());
            segment_ids.push(1);
            token_to_orig_map.push(Some(doc.tok_to_orig[split_token_index]));
            token_is_max_context.push(Some(is_max_context(windows, window_index, split_token_index)));
        }
        tokens.push(SEP_TOKEN.to_string());
        segment_ids.push(1);
        token_to_orig_map.push(None);
        token_is_max_context.push(None);

        let mut input_ids = self.tokenizer.convert_tokens_to_ids(&tokens)?;
        if input_ids.len() != tokens.len() {
            return Err(SquadError::Tokenizer(format!(
                "{} ids returned for {} tokens",
                input_ids.len(),
                tokens.len()
            )));
        }

        // ── Zero-pad up to the sequence length ────────────────────────────────
        let valid_length = input_ids.len();
        input_ids.resize(self.config.max_seq_length, 0);
        segment_ids.resize(self.config.max_seq_length, 0);

        let (start_position, end_position) = match answer {
            Some(span) if span.start >= window.start && span.end <= window.end() => {
                let doc_offset = query_tokens.len() + 2;
                (
                    span.start - window.start + doc_offset,
                    span.end - window.start + doc_offset,
                )
            }
            // impossible, unlabeled, or the answer is outside this window
            _ => (0, 0),
        };

        Ok(SquadFeature {
            sequence_id: example.sequence_id,
            qas_id: example.qas_id.clone(),
            window_index,
            tokens,
            token_to_orig_map,
            token_is_max_context,
            input_ids,
            valid_length,
            segment_ids,
            start_position,
            end_position,
            is_impossible: example.is_impossible,
        })
    }
}
