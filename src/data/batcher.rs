// ============================================================
// Layer 4 - Feature Batcher
// ============================================================
// Implements Burn's Batcher trait to stack FeatureRecords into
// integer tensors for a BERT-style QA model.
//
// How batching works here:
//   Input:  Vec of N FeatureRecords, each with sequences of length S
//   Output: FeatureBatch with [N, S] sequence tensors and [N]
//           scalar tensors
//
// Every sequence was already padded to max_seq_length by the
// feature assembler, so no dynamic padding happens here.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::feature::FeatureRecord;

// ─── FeatureBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    /// Shape: [batch_size]
    pub sequence_ids: Tensor<B, 1, Int>,

    /// Token ids. Shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// 0 = query segment / padding, 1 = document segment.
    /// Shape: [batch_size, seq_len]
    pub segment_ids: Tensor<B, 2, Int>,

    /// Non-padding length of each row. Shape: [batch_size]
    pub valid_lengths: Tensor<B, 1, Int>,

    /// Shape: [batch_size]
    pub start_positions: Tensor<B, 1, Int>,

    /// Shape: [batch_size]
    pub end_positions: Tensor<B, 1, Int>,
}

// ─── FeatureBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct FeatureBatcher;

impl FeatureBatcher {
    pub fn new() -> Self {
        Self
    }
}

fn sequence_tensor<B: Backend>(
    items:   &[FeatureRecord],
    seq_len: usize,
    field:   impl Fn(&FeatureRecord) -> &[u32],
    device:  &B::Device,
) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = items
        .iter()
        .flat_map(|r| field(r).iter().map(|&x| x as i64))
        .collect();
    Tensor::from_data(TensorData::new(flat, [items.len(), seq_len]), device)
}

fn scalar_tensor<B: Backend>(
    items:  &[FeatureRecord],
    field:  impl Fn(&FeatureRecord) -> usize,
    device: &B::Device,
) -> Tensor<B, 1, Int> {
    let values: Vec<i64> = items.iter().map(|r| field(r) as i64).collect();
    let len = values.len();
    Tensor::from_data(TensorData::new(values, [len]), device)
}

impl<B: Backend> Batcher<B, FeatureRecord, FeatureBatch<B>> for FeatureBatcher {
    fn batch(&self, items: Vec<FeatureRecord>, device: &B::Device) -> FeatureBatch<B> {
        // all rows share max_seq_length
        let seq_len = items.first().map_or(0, |r| r.input_ids.len());

        FeatureBatch {
            sequence_ids:    scalar_tensor(&items, |r| r.sequence_id, device),
            input_ids:       sequence_tensor(&items, seq_len, |r| r.input_ids.as_slice(), device),
            segment_ids:     sequence_tensor(&items, seq_len, |r| r.segment_ids.as_slice(), device),
            valid_lengths:   scalar_tensor(&items, |r| r.valid_length, device),
            start_positions: scalar_tensor(&items, |r| r.start_position, device),
            end_positions:   scalar_tensor(&items, |r| r.end_position, device),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn batch(items: Vec<FeatureRecord>) -> FeatureBatch<TestBackend> {
        let device = <TestBackend as Backend>::Device::default();
        <FeatureBatcher as Batcher<TestBackend, FeatureRecord, FeatureBatch<TestBackend>>>::batch(
            &FeatureBatcher::new(),
            items,
            &device,
        )
    }

    fn record(sequence_id: usize, start: usize, end: usize) -> FeatureRecord {
        FeatureRecord {
            sequence_id,
            input_ids:      vec![101, 7, 102, 9, 9, 102, 0, 0],
            segment_ids:    vec![0, 0, 0, 1, 1, 1, 0, 0],
            valid_length:   6,
            start_position: start,
            end_position:   end,
        }
    }

    #[test]
    fn test_batch_shapes() {
        let batch = batch(vec![record(0, 3, 4), record(0, 0, 0), record(1, 4, 4)]);

        assert_eq!(batch.input_ids.dims(), [3, 8]);
        assert_eq!(batch.segment_ids.dims(), [3, 8]);
        assert_eq!(batch.valid_lengths.dims(), [3]);
        assert_eq!(batch.start_positions.dims(), [3]);
    }

    #[test]
    fn test_batch_values() {
        let batch = batch(vec![record(2, 3, 4), record(5, 0, 0)]);

        let starts: Vec<i64> = batch.start_positions.into_data().iter::<i64>().collect();
        let ends: Vec<i64>   = batch.end_positions.into_data().iter::<i64>().collect();
        let ids: Vec<i64>    = batch.sequence_ids.into_data().iter::<i64>().collect();
        let segs: Vec<i64>   = batch.segment_ids.into_data().iter::<i64>().collect();

        assert_eq!(starts, vec![3, 0]);
        assert_eq!(ends, vec![4, 0]);
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(&segs[..8], &[0, 0, 0, 1, 1, 1, 0, 0]);
    }
}
