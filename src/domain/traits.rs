// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The seams between the feature pipeline and its collaborators.
//
//   SubwordTokenizer → the opaque sub-word tokenizer capability
//   RecordSource     → anything that yields flattened QA records
//
// The pipeline only ever talks to these traits, so a WordPiece
// tokenizer from tokenizer.json, a word-level fallback vocabulary,
// or a hand-written test tokenizer are interchangeable.

use crate::domain::error::Result;
use crate::domain::record::SquadRecord;

// ─── SubwordTokenizer ─────────────────────────────────────────────────────────
/// Splits text into sub-word tokens and maps tokens to vocabulary ids.
///
/// Implementations must be deterministic and free of side effects:
/// the same input always yields the same tokens. They are shared
/// across worker threads, hence `Send + Sync`.
///
/// Implementations:
///   - tokenizers::Tokenizer (see infra::tokenizer_store)
pub trait SubwordTokenizer: Send + Sync {
    /// Tokenise a piece of text into ordered sub-tokens.
    /// Must NOT add special tokens such as [CLS] or [SEP].
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Map each token to its vocabulary id, in order.
    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Result<Vec<u32>>;
}

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce question records in source order.
///
/// Implementations:
///   - SquadLoader → reads a SQuAD v1.1 / v2.0 JSON file
pub trait RecordSource {
    fn load_records(&self) -> anyhow::Result<Vec<SquadRecord>>;
}
