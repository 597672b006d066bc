// ============================================================
// Layer 3 - SquadFeature Domain Type
// ============================================================
// One model-ready window over one example.
//
// Sequence layout:
//   [CLS] query tokens [SEP] window tokens [SEP] [PAD]...
//    seg 0  seg 0       seg 0 seg 1        seg 1  0
//
// start_position / end_position index into this layout. Both are
// 0 (pointing at [CLS]) when the window holds no answer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadFeature {
    /// Copied from the example; several features may share it
    pub sequence_id: usize,

    pub qas_id: String,

    /// Ordinal of this window among the example's windows
    pub window_index: usize,

    /// The unpadded token sequence; its length equals `valid_length`
    pub tokens: Vec<String>,

    /// Position in `tokens` → word index in the example's doc_tokens.
    /// Only document-window positions are `Some`.
    pub token_to_orig_map: Vec<Option<usize>>,

    /// Position in `tokens` → whether this window is the token's
    /// max-context owner. Only document-window positions are `Some`.
    pub token_is_max_context: Vec<Option<bool>>,

    /// Token ids, zero padded to max_seq_length
    pub input_ids: Vec<u32>,

    /// Number of non-padding positions
    pub valid_length: usize,

    /// 0 for the query segment, 1 for the document segment, 0 for padding
    pub segment_ids: Vec<u32>,

    pub start_position: usize,
    pub end_position:   usize,

    pub is_impossible: bool,
}

impl SquadFeature {
    /// True when this window carries an answer label.
    pub fn has_answer(&self) -> bool {
        self.start_position != 0 || self.end_position != 0
    }

    /// Project the fields a batcher needs.
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord {
            sequence_id:    self.sequence_id,
            input_ids:      self.input_ids.clone(),
            segment_ids:    self.segment_ids.clone(),
            valid_length:   self.valid_length,
            start_position: self.start_position,
            end_position:   self.end_position,
        }
    }
}

/// The fixed-field projection of a feature that gets batched
/// into tensors. All sequences are already max_seq_length long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub sequence_id:    usize,
    pub input_ids:      Vec<u32>,
    pub segment_ids:    Vec<u32>,
    pub valid_length:   usize,
    pub start_position: usize,
    pub end_position:   usize,
}

impl From<&SquadFeature> for FeatureRecord {
    fn from(feature: &SquadFeature) -> Self {
        feature.to_record()
    }
}
