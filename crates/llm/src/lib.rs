//! LLM integration for inner-map
//!
//! An OpenAI-compatible client exposing the three capabilities the interview
//! needs: asking questions, synthesizing a structured insight, and painting
//! the symbolic image.

mod ai_types;
mod client;
mod error;
mod image;
mod insights;
mod prompts;
mod provider;
mod questions;

#[cfg(test)]
mod client_tests;

pub use client::{DEFAULT_IMAGE_MODEL, DEFAULT_MODEL, LlmClient, truncate};
pub use error::LlmError;
pub use image::GeneratedImage;
pub use insights::{SynthesizedInsight, parse_synthesized_insight};
pub use prompts::format_transcript_for_question;
pub use provider::{ImageProvider, InsightProvider, QuestionProvider};
