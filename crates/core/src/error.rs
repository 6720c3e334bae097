use thiserror::Error;

/// Errors raised by domain type invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("question {pair} has not been asked")]
    UnaskedQuestion { pair: usize },

    #[error("invalid turn limits: min {min}, max {max}")]
    InvalidLimits { min: usize, max: usize },

    #[error("unknown pattern icon: {0}")]
    UnknownIcon(String),
}
