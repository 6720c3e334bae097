//! Capability traits consumed by the interview and synthesis services.
//!
//! `LlmClient` implements all three; tests substitute scripted fakes.

use async_trait::async_trait;
use inner_map_core::Transcript;

use crate::{GeneratedImage, LlmError, SynthesizedInsight};

/// Asks interview questions.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Opening question, asked with no prior context.
    async fn start_conversation(&self) -> Result<String, LlmError>;

    /// Next question given everything said so far.
    async fn next_question(&self, transcript: &Transcript) -> Result<String, LlmError>;
}

/// Turns the respondent's answers into a structured insight.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// `answers` is the ordinal-labelled answer text, question text excluded.
    async fn synthesize(&self, answers: &str) -> Result<SynthesizedInsight, LlmError>;
}

/// Paints one square image from a prompt.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, LlmError>;
}
