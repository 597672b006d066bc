// ============================================================
// Layer 2 - ConvertUseCase
// ============================================================
// Orchestrates a full conversion run in order:
//
//   Step 1: Load SQuAD records          (Layer 4 - data)
//   Step 2: Build / load tokenizer      (Layer 6 - infra)
//   Step 3: Build examples              (Layer 4 - data)
//   Step 4: Transform in a worker pool  (Layer 4 + Layer 6)
//   Step 5: Write features and config   (Layer 6 - infra)

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::assembler::FeatureTransform;
use crate::data::example_builder::ExampleBuilder;
use crate::data::loader::SquadLoader;
use crate::domain::config::FeatureConfig;
use crate::domain::feature::SquadFeature;
use crate::domain::record::SquadRecord;
use crate::domain::traits::{RecordSource, SubwordTokenizer};
use crate::infra::{feature_store::FeatureStore, pool::WorkerPool, tokenizer_store::TokenizerStore};

// ─── Conversion Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// SQuAD JSON file to read
    pub input: PathBuf,
    /// Where features.jsonl and friends are written
    pub output_dir: PathBuf,
    /// Directory holding (or receiving) tokenizer.json
    pub tokenizer_dir: PathBuf,
    /// Size of the fallback word-level vocabulary
    pub vocab_size: usize,
    /// Worker threads; 0 means one per CPU
    pub num_workers: usize,
    pub features: FeatureConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input:         PathBuf::from("data/train-v1.1.json"),
            output_dir:    PathBuf::from("features"),
            tokenizer_dir: PathBuf::from("tokenizer"),
            vocab_size:    30522,
            num_workers:   8,
            features:      FeatureConfig::default(),
        }
    }
}

// ─── Conversion Summary ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Question records read from the input
    pub records: usize,
    /// Examples kept after the answer-recovery check
    pub examples: usize,
    /// Records dropped because their answer could not be recovered
    pub dropped: usize,
    pub features: usize,
    /// Features whose window contains the answer
    pub labelled_features: usize,
    pub elapsed_ms: u64,
}

// ─── ConvertUseCase ──────────────────────────────────────────────────────────
pub struct ConvertUseCase {
    config: ConvertConfig,
}

impl ConvertUseCase {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline and persist its output.
    pub fn execute(&self) -> Result<ConversionSummary> {
        let cfg = &self.config;

        // ── Step 1: Load records ──────────────────────────────────────────────
        let records = SquadLoader::new(&cfg.input).load_records()?;

        // ── Step 2: Build / load tokenizer ────────────────────────────────────
        let tok_store = TokenizerStore::new(&cfg.tokenizer_dir);
        let tokenizer = tok_store.load_or_build(&corpus_texts(&records), cfg.vocab_size)?;

        // ── Steps 3-4: Examples and features ──────────────────────────────────
        let (features, summary) = self.featurize(&records, Arc::new(tokenizer))?;

        // ── Step 5: Persist ───────────────────────────────────────────────────
        let store = FeatureStore::new(&cfg.output_dir)?;
        store.save_config(&cfg.features)?;
        store.write_features(&features)?;
        store.save_summary(&summary)?;

        Ok(summary)
    }

    /// Build examples from `records` and transform them into features.
    pub fn featurize(
        &self,
        records:   &[SquadRecord],
        tokenizer: Arc<dyn SubwordTokenizer>,
    ) -> Result<(Vec<SquadFeature>, ConversionSummary)> {
        let start = Instant::now();
        let cfg   = &self.config;

        let report = ExampleBuilder::from_config(&cfg.features)
            .build(records)
            .context("Cannot build examples from SQuAD records")?;
        if report.dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} records whose answer text was not found",
                report.dropped,
                report.records_seen
            );
        }
        tracing::info!("Built {} examples", report.examples.len());

        let transform = FeatureTransform::new(tokenizer, cfg.features.clone())?;
        let pool      = WorkerPool::new(cfg.num_workers)?;
        let features  = pool.transform_all(&transform, &report.examples)?;

        let summary = ConversionSummary {
            records:           report.records_seen,
            examples:          report.examples.len(),
            dropped:           report.dropped,
            features:          features.len(),
            labelled_features: features.iter().filter(|f| f.has_answer()).count(),
            elapsed_ms:        start.elapsed().as_millis() as u64,
        };
        Ok((features, summary))
    }
}

/// Distinct paragraphs plus every question and answer text, used to
/// build the fallback vocabulary.
fn corpus_texts(records: &[SquadRecord]) -> Vec<&str> {
    let mut seen  = HashSet::new();
    let mut texts = Vec::new();
    for record in records {
        if seen.insert(record.paragraph_index) {
            texts.push(&*record.context);
        }
        texts.push(record.question.as_str());
        texts.extend(record.answers.iter().map(|a| a.text.as_str()));
    }
    texts
}
