// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. Printing happens here and nowhere else.
//
//   1. `convert` - SQuAD JSON → features.jsonl
//   2. `inspect` - corpus statistics

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ConvertArgs, InspectArgs};

use crate::domain::config::FeatureConfig;

#[derive(Parser, Debug)]
#[command(
    name = "squad-features",
    version,
    about = "Turn SQuAD question/paragraph pairs into fixed-length BERT input features."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Convert(args) => run_convert(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    use crate::application::convert_use_case::ConvertUseCase;

    tracing::info!("Converting '{}'", args.input.display());
    let output_dir = args.output_dir.clone();

    let summary = ConvertUseCase::new(args.into()).execute()?;

    println!(
        "Converted {} questions into {} features ({} labelled), dropped {}.",
        summary.records, summary.features, summary.labelled_features, summary.dropped
    );
    println!("Output written to '{}'", output_dir.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let features = FeatureConfig::from(&args);
    let stats    = InspectUseCase::new(args.input, features).execute()?;
    println!("{stats}");
    Ok(())
}
