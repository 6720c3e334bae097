//! Typed error enum for the LLM crate.

use thiserror::Error;

/// Errors from LLM API operations.
///
/// `Schema` means the provider answered but the structured insight did not
/// match the expected shape; every other variant is a provider failure.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response: no content returned")]
    EmptyResponse,
    #[error("missing field in response: {0}")]
    MissingField(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("image decoding failed: {0}")]
    Image(String),
    #[error("insight does not match schema: {0}")]
    Schema(String),
}

impl LlmError {
    /// Whether the provider responded with a malformed structured insight.
    #[must_use]
    pub const fn is_schema_violation(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}
