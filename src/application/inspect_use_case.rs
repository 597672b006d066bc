// ============================================================
// Layer 2 - InspectUseCase
// ============================================================
// Reads a SQuAD file and reports what a conversion would see:
// question and paragraph counts, how many questions are
// unanswerable, and how many answers the example builder
// would drop. Nothing is tokenized or written.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::example_builder::ExampleBuilder;
use crate::data::loader::SquadLoader;
use crate::data::segmenter::whitespace_tokenize;
use crate::domain::config::FeatureConfig;
use crate::domain::record::SquadRecord;
use crate::domain::traits::RecordSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    pub records: usize,
    pub paragraphs: usize,
    /// Questions flagged impossible; only counted in SQuAD 2.0 mode
    pub impossible: usize,
    /// Records whose answer could not be recovered from the paragraph.
    /// Always 0 in evaluation mode, where answers are not read.
    pub unrecoverable: usize,
    pub avg_context_words: f32,
    pub max_context_words: usize,
    pub avg_question_chars: f32,
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SQuAD corpus statistics:")?;
        writeln!(f, "  Questions:            {}", self.records)?;
        writeln!(f, "  Paragraphs:           {}", self.paragraphs)?;
        writeln!(f, "  Impossible questions: {}", self.impossible)?;
        writeln!(f, "  Unrecoverable:        {}", self.unrecoverable)?;
        writeln!(f, "  Avg context length:   {:.1} words", self.avg_context_words)?;
        writeln!(f, "  Max context length:   {} words", self.max_context_words)?;
        write!(f,   "  Avg question length:  {:.1} chars", self.avg_question_chars)
    }
}

pub struct InspectUseCase {
    input:    PathBuf,
    features: FeatureConfig,
}

impl InspectUseCase {
    pub fn new(input: impl Into<PathBuf>, features: FeatureConfig) -> Self {
        Self { input: input.into(), features }
    }

    pub fn execute(&self) -> Result<CorpusStats> {
        let records = SquadLoader::new(&self.input).load_records()?;
        collect_stats(&records, &self.features)
    }
}

/// Compute corpus statistics. Answer recovery is checked the same
/// way `convert` does it, so `unrecoverable` matches its drop count.
pub fn collect_stats(records: &[SquadRecord], features: &FeatureConfig) -> Result<CorpusStats> {
    let report = ExampleBuilder::from_config(features)
        .build(records)
        .context("Cannot build examples from SQuAD records")?;

    let mut seen          = HashSet::new();
    let mut context_words = Vec::new();
    for record in records {
        if seen.insert(record.paragraph_index) {
            context_words.push(whitespace_tokenize(&record.context).len());
        }
    }

    let question_chars: usize = records.iter().map(|r| r.question.chars().count()).sum();

    Ok(CorpusStats {
        records:            records.len(),
        paragraphs:         context_words.len(),
        impossible:         records
            .iter()
            .filter(|r| features.allow_impossible && r.is_impossible)
            .count(),
        unrecoverable:      report.dropped,
        avg_context_words:  mean(context_words.iter().sum(), context_words.len()),
        max_context_words:  context_words.iter().copied().max().unwrap_or(0),
        avg_question_chars: mean(question_chars, records.len()),
    })
}

fn mean(total: usize, n: usize) -> f32 {
    if n == 0 { 0.0 } else { total as f32 / n as f32 }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::record::RawAnswer;

    #[test]
    fn test_collect_stats() {
        let p0: Arc<str> = "one two three four".into();
        let p1: Arc<str> = "alpha beta".into();
        let records = vec![
            SquadRecord::new(0, Arc::clone(&p0), "abcd", "a", vec![RawAnswer::new("two", 4)], false),
            SquadRecord::new(0, p0, "ab", "b", vec![RawAnswer::new("zzz", 0)], false),
            SquadRecord::new(1, p1, "abcdef", "c", vec![], true),
        ];
        let cfg = FeatureConfig { allow_impossible: true, ..Default::default() };

        let stats = collect_stats(&records, &cfg).unwrap();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.impossible, 1);
        assert_eq!(stats.unrecoverable, 1);
        assert_eq!(stats.max_context_words, 4);
        assert!((stats.avg_context_words - 3.0).abs() < 1e-6);
        assert!((stats.avg_question_chars - 4.0).abs() < 1e-6);
        assert!(stats.to_string().contains("Paragraphs:           2"));
    }

    #[test]
    fn test_impossible_needs_version_2() {
        let ctx: Arc<str> = "alpha beta".into();
        let records = vec![SquadRecord::new(0, ctx, "q", "a", vec![RawAnswer::new("beta", 6)], true)];

        let stats = collect_stats(&records, &FeatureConfig::default()).unwrap();
        assert_eq!(stats.impossible, 0);
        assert_eq!(stats.unrecoverable, 0);
    }

    #[test]
    fn test_several_answers_in_eval_mode() {
        // dev files list every annotator's answer
        let ctx: Arc<str> = "one two three".into();
        let answers = vec![RawAnswer::new("two", 4), RawAnswer::new("two three", 4)];
        let records = vec![SquadRecord::new(0, ctx, "which?", "dev", answers, false)];

        let eval  = FeatureConfig { is_training: false, ..Default::default() };
        let stats = collect_stats(&records, &eval).unwrap();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.unrecoverable, 0);

        assert!(collect_stats(&records, &FeatureConfig::default()).is_err());
    }

    #[test]
    fn test_empty_corpus() {
        let stats = collect_stats(&[], &FeatureConfig::default()).unwrap();
        assert_eq!(stats, CorpusStats::default());
    }
}
