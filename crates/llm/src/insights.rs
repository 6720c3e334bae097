use std::str::FromStr;

use async_trait::async_trait;
use inner_map_core::{PATTERN_COUNT, Pattern, PatternIcon, strip_markdown_json};
use serde::Deserialize;

use crate::ai_types::{ChatRequest, JsonSchema, Message, ResponseFormat};
use crate::client::{LlmClient, truncate};
use crate::error::LlmError;
use crate::prompts::{SYNTHESIZER_INSTRUCTION, build_insight_prompt, insight_schema};
use crate::provider::InsightProvider;

/// Structured insight as returned by the provider, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedInsight {
    pub reflection: String,
    pub poem: String,
    pub patterns: [Pattern; PATTERN_COUNT],
    pub symbolic_map_title: String,
    pub symbolic_map_description: String,
    /// Prompt for the image capability; never shown to the user.
    pub image_prompt: String,
    pub is_milestone: bool,
    /// `None` when the provider gave no reason or an empty one.
    pub milestone_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightJson {
    reflection: String,
    poem: String,
    symbolic_map_title: String,
    symbolic_map_description: String,
    symbolic_map_image_prompt: String,
    patterns: Vec<PatternJson>,
    is_milestone: bool,
    #[serde(default)]
    milestone_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternJson {
    icon_name: String,
    title: String,
    description: String,
}

/// Parse and validate the provider's structured insight.
///
/// # Errors
/// Returns `LlmError::Schema` if the content is not a JSON object of the
/// expected shape, does not carry exactly three patterns, names an unknown
/// icon, or has an empty image prompt.
pub fn parse_synthesized_insight(content: &str) -> Result<SynthesizedInsight, LlmError> {
    let json = strip_markdown_json(content);
    let raw: InsightJson = serde_json::from_str(json)
        .map_err(|e| LlmError::Schema(format!("{e} - content: {}", truncate(json, 300))))?;

    let count = raw.patterns.len();
    if count != PATTERN_COUNT {
        return Err(LlmError::Schema(format!("expected {PATTERN_COUNT} patterns, got {count}")));
    }
    let patterns: Vec<Pattern> = raw
        .patterns
        .into_iter()
        .map(|p| {
            let icon_kind = PatternIcon::from_str(&p.icon_name)
                .map_err(|e| LlmError::Schema(e.to_string()))?;
            Ok(Pattern { icon_kind, title: p.title, description: p.description })
        })
        .collect::<Result<_, LlmError>>()?;
    let patterns: [Pattern; PATTERN_COUNT] = patterns
        .try_into()
        .map_err(|_| LlmError::Schema(format!("expected {PATTERN_COUNT} patterns")))?;

    if raw.symbolic_map_image_prompt.trim().is_empty() {
        return Err(LlmError::Schema("symbolicMapImagePrompt is empty".to_owned()));
    }

    Ok(SynthesizedInsight {
        reflection: raw.reflection,
        poem: raw.poem,
        patterns,
        symbolic_map_title: raw.symbolic_map_title,
        symbolic_map_description: raw.symbolic_map_description,
        image_prompt: raw.symbolic_map_image_prompt,
        is_milestone: raw.is_milestone,
        milestone_reason: raw.milestone_reason.filter(|r| !r.trim().is_empty()),
    })
}

#[async_trait]
impl InsightProvider for LlmClient {
    async fn synthesize(&self, answers: &str) -> Result<SynthesizedInsight, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYNTHESIZER_INSTRUCTION),
                Message::user(build_insight_prompt(answers)),
            ],
            response_format: Some(ResponseFormat {
                format_type: "json_schema".to_owned(),
                json_schema: Some(JsonSchema {
                    name: "inner_map_insight".to_owned(),
                    strict: false,
                    schema: insight_schema(),
                }),
            }),
        };

        let content = self.chat_completion(&request).await?;
        let insight = parse_synthesized_insight(&content)?;
        tracing::info!(is_milestone = insight.is_milestone, "synthesized insight");
        Ok(insight)
    }
}
