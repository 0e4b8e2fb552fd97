use thiserror::Error;

/// Errors that can occur during sentitree core operations.
#[derive(Debug, Error)]
pub enum SentitreeError {
    /// A bracketed tree line could not be parsed.
    #[error("malformed tree at byte {position}: {reason}")]
    MalformedTree {
        /// Byte offset in the line where parsing stopped.
        position: usize,
        /// What the parser expected.
        reason: String,
    },

    /// A raw tree label has no entry in the label map.
    #[error("tree label {0:?} has no class name")]
    UnknownTreeLabel(String),

    /// A token is missing from the vocabulary.
    #[error("token {0:?} is not in the vocabulary")]
    UnknownToken(String),

    /// A label is missing from the label encoding.
    #[error("label {0:?} is not in the label encoding")]
    UnknownLabel(String),

    /// The vocabulary lacks the sequence markers a transformer batch needs.
    #[error("vocabulary has no {0} token")]
    MissingSpecialTokens(&'static str),

    /// An encoder was handed zero examples.
    #[error("cannot encode an empty batch")]
    EmptyBatch,

    /// Candle tensor construction failed.
    #[error("tensor error: {0}")]
    Tensor(String),

    /// A Hugging Face tokenizer failed to load or run.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// Reading or writing a vocabulary file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A vocabulary file held invalid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<candle_core::Error> for SentitreeError {
    fn from(err: candle_core::Error) -> Self {
        SentitreeError::Tensor(err.to_string())
    }
}

/// Result type alias for sentitree core operations.
pub type Result<T> = std::result::Result<T, SentitreeError>;
