use thiserror::Error;

/// Main error type for topk-eval
#[derive(Error, Debug)]
pub enum TopkEvalError {
    /// Caller supplied an unusable value (empty batch, k = 0, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding widths or row counts disagree
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TopkEvalError {
    pub(crate) fn dimension_mismatch(
        context: impl Into<String>,
        expected: usize,
        got: usize,
    ) -> Self {
        TopkEvalError::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }
}

/// Convenient Result type using TopkEvalError
pub type Result<T> = std::result::Result<T, TopkEvalError>;
