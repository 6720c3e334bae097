//! Typed errors for the service layer.

use inner_map_core::CoreError;
use inner_map_llm::LlmError;
use thiserror::Error;

use crate::view::InvalidTransition;

/// Why the question-flow controller rejected an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("a question is still loading")]
    Busy,
    #[error("no question is available at this step")]
    NoQuestion,
    #[error("the current question has not been answered")]
    Unanswered,
    #[error("this is the last question; finish the interview instead")]
    AtLastQuestion,
    #[error("answer at least {required} questions before finishing ({answered} so far)")]
    FinishNotAllowed { answered: usize, required: usize },
    #[error("the interview is already complete")]
    Completed,
    #[error("there is no failed request to retry")]
    NothingToRetry,
    #[error(transparent)]
    Transcript(#[from] CoreError),
}

/// Service-layer error unifying provider, flow and navigation failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The provider could not be reached or answered with an error.
    #[error("provider: {0}")]
    Provider(#[source] LlmError),

    /// The provider's structured insight did not match the schema.
    #[error("synthesis: {0}")]
    Synthesis(#[source] LlmError),

    #[error("interview: {0}")]
    Flow(#[from] FlowError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// No interview is running.
    #[error("no interview in progress")]
    NoInterview,

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        if err.is_schema_violation() { Self::Synthesis(err) } else { Self::Provider(err) }
    }
}

impl ServiceError {
    /// Whether the user can recover by repeating the same action.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
