// ============================================================
// Layer 3 - Feature Configuration
// ============================================================
// Length limits and label mode for the feature transform.
// Serialisable so the exact settings can be saved next to the
// generated features and reloaded by whoever consumes them.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, SquadError};

/// [CLS] + [SEP] + [SEP]
pub const NUM_SPECIAL_TOKENS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Total length of every feature's input_ids / segment_ids
    pub max_seq_length: usize,

    /// Maximum step between the starts of consecutive windows
    pub doc_stride: usize,

    /// Questions longer than this (in sub-tokens) are truncated
    pub max_query_length: usize,

    /// Read answer labels and emit start/end positions
    pub is_training: bool,

    /// SQuAD 2.0 mode: questions may be marked impossible
    pub allow_impossible: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            max_seq_length:   384,
            doc_stride:       128,
            max_query_length: 64,
            is_training:      true,
            allow_impossible: false,
        }
    }
}

impl FeatureConfig {
    /// Check the limits that do not depend on a particular query.
    /// Whether a given question still leaves room for document
    /// tokens is checked per example by the window splitter.
    pub fn validate(&self) -> Result<()> {
        if self.doc_stride == 0 {
            return Err(SquadError::InvalidConfiguration(
                "doc_stride must be at least 1".into(),
            ));
        }
        if self.max_seq_length <= NUM_SPECIAL_TOKENS {
            return Err(SquadError::InvalidConfiguration(format!(
                "max_seq_length ({}) must exceed the {} special tokens",
                self.max_seq_length, NUM_SPECIAL_TOKENS
            )));
        }
        Ok(())
    }
}
