// ============================================================
// Layer 6 - Feature Store
// ============================================================
// Persists the output of a conversion run.
//
// Directory layout:
//   <output_dir>/
//     features.jsonl        ← one SquadFeature per line, source order
//     feature_config.json   ← the FeatureConfig the features were built with
//     summary.json          ← counts and timing of the run
//
// Saving the config next to the features lets a consumer rebuild
// exactly the same transform (e.g. to featurise new questions at
// inference time with matching window sizes).

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};

use crate::application::convert_use_case::ConversionSummary;
use crate::domain::config::FeatureConfig;
use crate::domain::feature::SquadFeature;

pub const FEATURES_FILE: &str = "features.jsonl";
pub const CONFIG_FILE: &str   = "feature_config.json";
pub const SUMMARY_FILE: &str  = "summary.json";

pub struct FeatureStore {
    dir: PathBuf,
}

impl FeatureStore {
    /// Create a store, creating its directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn features_path(&self) -> PathBuf {
        self.dir.join(FEATURES_FILE)
    }

    /// Write all features as JSON lines, replacing any previous file.
    pub fn write_features(&self, features: &[SquadFeature]) -> Result<PathBuf> {
        let path   = self.features_path();
        let file   = File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);

        for feature in features {
            serde_json::to_writer(&mut writer, feature)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        tracing::info!("Wrote {} features to '{}'", features.len(), path.display());
        Ok(path)
    }

    /// Read features back in file order.
    pub fn read_features(&self) -> Result<Vec<SquadFeature>> {
        let path = self.features_path();
        let file = File::open(&path)
            .with_context(|| format!("Cannot open '{}'. Have you run 'convert'?", path.display()))?;

        let mut features = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let feature: SquadFeature = serde_json::from_str(&line)
                .with_context(|| format!("Bad feature on line {} of '{}'", line_no + 1, path.display()))?;
            features.push(feature);
        }
        Ok(features)
    }

    pub fn save_config(&self, cfg: &FeatureConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved feature config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<FeatureConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_summary(&self, summary: &ConversionSummary) -> Result<()> {
        let path = self.dir.join(SUMMARY_FILE);
        fs::write(&path, serde_json::to_string_pretty(summary)?)
            .with_context(|| format!("Cannot write summary to '{}'", path.display()))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn feature(sequence_id: usize, window_index: usize) -> SquadFeature {
        SquadFeature {
            sequence_id,
            qas_id: format!("q{sequence_id}"),
            window_index,
            tokens: vec!["[CLS]".into(), "x".into(), "[SEP]".into(), "y".into(), "[SEP]".into()],
            token_to_orig_map: vec![None, None, None, Some(0), None],
            token_is_max_context: vec![None, None, None, Some(true), None],
            input_ids: vec![101, 5, 102, 6, 102, 0],
            valid_length: 5,
            segment_ids: vec![0, 0, 0, 1, 1, 0],
            start_position: 3,
            end_position: 3,
            is_impossible: false,
        }
    }

    #[test]
    fn test_features_keep_order() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("out")).unwrap();
        let written = vec![feature(0, 0), feature(0, 1), feature(2, 0)];

        store.write_features(&written).unwrap();
        let contents = fs::read_to_string(store.features_path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(store.read_features().unwrap(), written);
    }

    #[test]
    fn test_config_is_persisted() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path()).unwrap();
        let cfg   = FeatureConfig { allow_impossible: true, doc_stride: 64, ..Default::default() };

        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_missing_features_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FeatureStore::new(dir.path()).unwrap().read_features().is_err());
    }
}
