use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ai_types::{ChatRequest, ChatResponse};
use crate::error::LlmError;

/// Default chat model used for questions and synthesis.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default model used for the symbolic image.
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
/// Image generation is slow; the timeout covers it as well as chat calls.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for an OpenAI-compatible API.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) image_model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a new client with the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_image_model(mut self, image_model: String) -> Self {
        self.image_model = image_model;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// POST a JSON body to `path` and decode the JSON reply. One attempt,
    /// no retries.
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B, context: &str) -> Result<R, LlmError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), context, "provider returned error status");
            return Err(LlmError::HttpStatus { code: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|e| LlmError::JsonParse {
            context: format!("{context} (body: {})", truncate(&text, 200)),
            source: e,
        })
    }

    /// Send a chat completion request and return the first choice's content.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails, the API returns a
    /// non-success status, the response body cannot be parsed, or no content
    /// came back.
    pub(crate) async fn chat_completion(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response: ChatResponse =
            self.post_json("/v1/chat/completions", request, "chat completion response").await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    s.get(..end).unwrap_or("")
}
