// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `convert` and `inspect`, and
// their flags. Conversion knobs mirror FeatureConfig.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::convert_use_case::ConvertConfig;
use crate::domain::config::FeatureConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a SQuAD JSON file into fixed-length model features
    Convert(ConvertArgs),

    /// Print statistics about a SQuAD JSON file
    Inspect(InspectArgs),
}

/// Window and labelling options shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct FeatureArgs {
    /// Total length of every feature: [CLS] query [SEP] doc [SEP] + padding
    #[arg(long, default_value_t = 384)]
    pub max_seq_length: usize,

    /// Token offset between the starts of consecutive document windows
    #[arg(long, default_value_t = 128)]
    pub doc_stride: usize,

    /// Questions longer than this many sub-tokens are truncated
    #[arg(long, default_value_t = 64)]
    pub max_query_length: usize,

    /// Evaluation mode: answers are not read and features are unlabelled
    #[arg(long)]
    pub eval: bool,

    /// SQuAD 2.0: honour `is_impossible` on questions
    #[arg(long)]
    pub version_2: bool,
}

impl From<FeatureArgs> for FeatureConfig {
    fn from(a: FeatureArgs) -> Self {
        FeatureConfig {
            max_seq_length:   a.max_seq_length,
            doc_stride:       a.doc_stride,
            max_query_length: a.max_query_length,
            is_training:      !a.eval,
            allow_impossible: a.version_2,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// SQuAD JSON file (v1.1 or v2.0)
    #[arg(long)]
    pub input: PathBuf,

    /// Directory receiving features.jsonl, feature_config.json and summary.json
    #[arg(long, default_value = "features")]
    pub output_dir: PathBuf,

    /// Directory holding tokenizer.json; a word-level one is built if missing
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: PathBuf,

    /// Vocabulary size of a freshly built tokenizer
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    #[command(flatten)]
    pub features: FeatureArgs,
}

/// Convert CLI args into the application-layer config.
/// The application layer never sees clap types.
impl From<ConvertArgs> for ConvertConfig {
    fn from(a: ConvertArgs) -> Self {
        ConvertConfig {
            input:         a.input,
            output_dir:    a.output_dir,
            tokenizer_dir: a.tokenizer_dir,
            vocab_size:    a.vocab_size,
            num_workers:   a.workers,
            features:      a.features.into(),
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// SQuAD JSON file to inspect
    #[arg(long)]
    pub input: PathBuf,

    /// Skip answer checks, as `convert --eval` does. Needed for dev
    /// files, which carry several answers per question
    #[arg(long)]
    pub eval: bool,

    /// Check answers the way `convert --version-2` would
    #[arg(long)]
    pub version_2: bool,
}

impl From<&InspectArgs> for FeatureConfig {
    fn from(a: &InspectArgs) -> Self {
        FeatureConfig {
            is_training:      !a.eval,
            allow_impossible: a.version_2,
            ..Default::default()
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::try_parse_from(["squad-features", "convert", "--input", "train.json"]).unwrap();
        let Commands::Convert(args) = cli.command else { panic!("expected convert") };
        let cfg: ConvertConfig = args.into();

        assert_eq!(cfg.input, PathBuf::from("train.json"));
        assert_eq!(cfg.num_workers, 8);
        assert_eq!(cfg.features, FeatureConfig::default());
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "squad-features", "convert", "--input", "dev.json",
            "--max-seq-length", "256", "--doc-stride", "64",
            "--eval", "--version-2", "--workers", "0",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else { panic!("expected convert") };
        let cfg: ConvertConfig = args.into();

        assert_eq!(cfg.num_workers, 0);
        assert_eq!(cfg.features.max_seq_length, 256);
        assert_eq!(cfg.features.doc_stride, 64);
        assert!(!cfg.features.is_training);
        assert!(cfg.features.allow_impossible);
    }

    #[test]
    fn test_inspect_eval_flag() {
        let cli = Cli::try_parse_from(["squad-features", "inspect", "--input", "dev.json", "--eval"]).unwrap();
        let Commands::Inspect(args) = cli.command else { panic!("expected inspect") };
        let cfg = FeatureConfig::from(&args);

        assert!(!cfg.is_training);
        assert!(!cfg.allow_impossible);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["squad-features", "convert"]).is_err());
    }
}
