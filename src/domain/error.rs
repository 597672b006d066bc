// ============================================================
// Layer 3 - Error Types
// ============================================================
// Errors raised by the feature pipeline itself.
//
// Only genuinely fatal conditions live here. An answer whose
// text cannot be recovered from the paragraph is NOT an error:
// the example builder logs it and drops the example.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SquadError>;

#[derive(Debug, Error)]
pub enum SquadError {
    /// A possible question in label mode must carry exactly one answer
    #[error("question {qas_id} has {count} answers; training expects exactly 1")]
    MalformedAnswerCount { qas_id: String, count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The tokenizer produced a token it cannot map back to an id
    #[error("token '{0}' is not in the vocabulary")]
    UnknownToken(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
