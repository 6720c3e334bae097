use async_trait::async_trait;
use inner_map_core::Transcript;

use crate::ai_types::{ChatRequest, Message};
use crate::client::LlmClient;
use crate::error::LlmError;
use crate::prompts::{ASKER_INSTRUCTION, OPENING_PROMPT, build_next_question_prompt};
use crate::provider::QuestionProvider;

impl LlmClient {
    async fn ask(&self, prompt: String) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(ASKER_INSTRUCTION), Message::user(prompt)],
            response_format: None,
        };
        let question = self.chat_completion(&request).await?;
        Ok(question.trim().to_owned())
    }
}

#[async_trait]
impl QuestionProvider for LlmClient {
    async fn start_conversation(&self) -> Result<String, LlmError> {
        self.ask(OPENING_PROMPT.to_owned()).await
    }

    async fn next_question(&self, transcript: &Transcript) -> Result<String, LlmError> {
        tracing::debug!(turns = transcript.len(), "requesting next question");
        self.ask(build_next_question_prompt(transcript)).await
    }
}
