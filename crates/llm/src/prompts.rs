use std::fmt::Write as _;

use inner_map_core::Transcript;

pub(crate) const ASKER_INSTRUCTION: &str = "You are a wise and gentle guide helping a person on a journey of self-discovery. \
Ask a series of deep, open-ended questions to understand their inner world. Start with lighter, more imaginative \
questions and move to more personal ones only if their answers invite it. Do not get stuck on one topic: after each \
answer, explore a different facet of their life, personality or values so the picture stays broad and holistic. \
Ask only one question at a time. Keep questions concise and empathetic, and never number them.";

pub(crate) const OPENING_PROMPT: &str = "Start the conversation with a warm welcome and a single, gentle, imaginative \
question to begin a journey of self-discovery. For example: \"If your current feelings were a landscape, what would \
it look like?\"";

pub(crate) const SYNTHESIZER_INSTRUCTION: &str = "You are a profound synthesizer of human experience. Analyze the \
person's answers to create a compassionate and insightful reflection, returned as a JSON object with the required \
structure. Look for significant breakthroughs, shifts in perspective or deep emotional revelations; if one is found, \
set isMilestone to true and give a brief milestoneReason, otherwise set milestoneReason to null.";

pub(crate) const IMAGE_STYLE: &str = "A serene and symbolic digital painting. Minimalist composition with a textured, \
painterly feel. Muted, sophisticated color palette. Focus on atmosphere and emotion over literal depiction.";

/// Render the transcript as `role: content` lines for the asker.
#[must_use]
pub fn format_transcript_for_question(transcript: &Transcript) -> String {
    let mut out = String::new();
    for turn in transcript.turns() {
        _ = writeln!(out, "{}: {}", turn.role.as_str(), turn.content);
    }
    out
}

pub(crate) fn build_next_question_prompt(transcript: &Transcript) -> String {
    format!(
        "Here is our conversation so far:\n\n{}\nAsk the next question. Explore a facet that has not been covered yet.",
        format_transcript_for_question(transcript)
    )
}

pub(crate) fn build_insight_prompt(answers: &str) -> String {
    format!("Based on these answers, generate the required insights.\n\nAnswers:\n{answers}")
}

/// JSON schema sent with the synthesis request.
pub(crate) fn insight_schema() -> serde_json::Value {
    let text = |description: &str| serde_json::json!({"type": "string", "description": description});
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "reflection": text("A long-form written reflection (250-350 words) synthesizing patterns and core longings in a kind, empathetic tone."),
            "poem": text("A short, evocative poem (6-10 lines) distilling the essence of the person's inner world."),
            "symbolicMapTitle": text("A short, evocative title for the symbolic map, like 'The Garden of Becoming'."),
            "symbolicMapDescription": text("A 2-3 sentence description of the symbolic map."),
            "symbolicMapImagePrompt": text(&format!("One detailed prompt for an image generator to create the symbolic visual. Style: '{IMAGE_STYLE}'")),
            "patterns": {
                "type": "array",
                "description": "Exactly 3 key patterns identified from the answers.",
                "minItems": 3,
                "maxItems": 3,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "iconName": {
                            "type": "string",
                            "enum": ["Shield", "Seedling", "Path", "Heart", "Anchor", "Lightbulb"],
                            "description": "The most fitting icon for this pattern."
                        },
                        "title": text("A short, impactful title for the pattern."),
                        "description": text("A 2-3 sentence description of the pattern.")
                    },
                    "required": ["iconName", "title", "description"]
                }
            },
            "isMilestone": {"type": "boolean", "description": "True if this session is a significant breakthrough or turning point."},
            "milestoneReason": {"type": ["string", "null"], "description": "If isMilestone is true, a 1-2 sentence explanation. Otherwise null."}
        },
        "required": [
            "reflection", "poem", "symbolicMapTitle", "symbolicMapDescription",
            "symbolicMapImagePrompt", "patterns", "isMilestone", "milestoneReason"
        ]
    })
}
