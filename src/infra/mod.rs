// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting pieces the pipeline needs but that are not part
// of the text-to-feature transform itself:
//
//   tokenizer_store.rs - The sub-word tokenizer capability.
//                        Loads a HuggingFace tokenizer.json, or
//                        builds a word-level vocabulary from the
//                        corpus when none exists.
//
//   pool.rs            - The rayon worker pool that applies the
//                        transform to every example and keeps
//                        source order.
//
//   feature_store.rs   - Writes features.jsonl, the feature config
//                        and a run summary; reads them back.

/// Tokenizer loading/building and the SubwordTokenizer impl
pub mod tokenizer_store;

/// Order-preserving parallel transform
pub mod pool;

/// Feature, config and summary persistence
pub mod feature_store;
