// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user goal each.
//
// Rules for this layer:
//   - No feature arithmetic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - File access only through Layer 4 loaders and Layer 6 stores

/// SQuAD JSON → features.jsonl
pub mod convert_use_case;

/// Corpus statistics without tokenizing
pub mod inspect_use_case;
