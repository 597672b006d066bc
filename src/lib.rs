// ============================================================
// squad-features
// ============================================================
// Turns SQuAD-style (question, paragraph, answer) records into
// fixed-length BERT input features:
//
//   Layer 1 - cli          argument parsing, printing
//   Layer 2 - application  convert / inspect workflows
//   Layer 3 - domain       records, examples, features, errors
//   Layer 4 - data         segment → align → window → assemble
//   Layer 6 - infra        tokenizer, worker pool, feature files

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod infra;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::error::{Result, SquadError};
