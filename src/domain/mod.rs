// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Pure Rust structs and traits describing the feature pipeline:
// the raw record, the normalised example, the model-ready
// feature, the tokenizer capability and the error type.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain structs, enums and traits
//
// Everything above this layer (data, application, cli) speaks
// in these types.

/// Library error type
pub mod error;

/// Length limits and label mode for the transform
pub mod config;

/// A flattened question record from a reader
pub mod record;

/// A question against a whitespace-tokenised paragraph
pub mod example;

/// A fixed-length window feature and its batching projection
pub mod feature;

/// Tokenizer and record-source abstractions
pub mod traits;
