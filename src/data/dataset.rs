use burn::data::dataset::Dataset;

use crate::domain::feature::{FeatureRecord, SquadFeature};

/// The generated features exposed through Burn's Dataset trait.
/// Items are the fixed-field projection the batcher consumes.
pub struct FeatureDataset {
    records: Vec<FeatureRecord>,
}

impl FeatureDataset {
    pub fn new(records: Vec<FeatureRecord>) -> Self { Self { records } }

    pub fn from_features(features: &[SquadFeature]) -> Self {
        Self::new(features.iter().map(FeatureRecord::from).collect())
    }

    pub fn record_count(&self) -> usize { self.records.len() }
}

impl Dataset<FeatureRecord> for FeatureDataset {
    fn get(&self, index: usize) -> Option<FeatureRecord> {
        self.records.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
