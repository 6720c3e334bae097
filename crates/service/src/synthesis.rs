//! Turns a finished transcript into an insight draft: one structured
//! synthesis call followed by one image call.

use std::sync::Arc;

use inner_map_core::{InsightDraft, SymbolicMap, Transcript};
use inner_map_llm::{ImageProvider, InsightProvider};

use crate::ServiceError;

/// Respondent answers labelled by position, question text left out.
#[must_use]
pub fn format_answers(transcript: &Transcript) -> String {
    transcript
        .answers()
        .enumerate()
        .map(|(i, answer)| format!("Answer {}: {answer}", i.saturating_add(1)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Clone)]
pub struct InsightSynthesizer {
    insights: Arc<dyn InsightProvider>,
    images: Arc<dyn ImageProvider>,
}

impl InsightSynthesizer {
    #[must_use]
    pub fn new(insights: Arc<dyn InsightProvider>, images: Arc<dyn ImageProvider>) -> Self {
        Self { insights, images }
    }

    /// Build a draft for `transcript`. The milestone fields are the
    /// provider's; the caller decides whether to override them.
    ///
    /// # Errors
    /// `ServiceError::Synthesis` when the structured response is malformed,
    /// `ServiceError::Provider` when either call fails.
    pub async fn synthesize(&self, transcript: Transcript) -> Result<InsightDraft, ServiceError> {
        let answers = format_answers(&transcript);
        tracing::info!(answers = transcript.answer_count(), "synthesizing insight");

        let insight = self.insights.synthesize(&answers).await?;
        let image = self.images.generate_image(&insight.image_prompt).await?;
        tracing::debug!(mime = %image.mime_type, bytes = image.bytes.len(), "symbolic map painted");

        Ok(InsightDraft {
            reflection: insight.reflection,
            poem: insight.poem,
            patterns: insight.patterns,
            symbolic_map: SymbolicMap {
                title: insight.symbolic_map_title,
                description: insight.symbolic_map_description,
                image_reference: image.to_data_url(),
            },
            is_milestone: insight.is_milestone,
            milestone_reason: insight.milestone_reason,
            transcript,
        })
    }
}
