// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between a SQuAD JSON file and model-ready tensors.
//
//   SQuAD .json
//       │
//       ▼
//   SquadLoader          → flattens articles/paragraphs into records
//       │
//       ▼
//   WhitespaceSegmenter  → words + char → word map per paragraph
//       │
//       ▼
//   ExampleBuilder       → word-level answer spans, drops unrecoverable
//       │
//       ▼
//   FeatureTransform     → per example:
//       │                    SpanAligner    (word span → sub-token span)
//       │                    WindowSplitter (overlapping doc windows)
//       │                    MaxContext     (owner window per token)
//       │                    assemble       (fixed-length features)
//       ▼
//   FeatureDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   FeatureBatcher       → stacks features into tensor batches
//
// Each module does exactly one step and is tested on its own.

/// Reads SQuAD v1.1 / v2.0 JSON into flat records
pub mod loader;

/// Whitespace word segmentation with a char → word map
pub mod segmenter;

/// Records → examples with word-level answer spans
pub mod example_builder;

/// Word span → best matching sub-token span
pub mod aligner;

/// Overlapping document windows and max-context ownership
pub mod window;

/// Examples → fixed-length features
pub mod assembler;

/// Burn Dataset over generated features
pub mod dataset;

/// Burn Batcher producing integer tensor batches
pub mod batcher;
