//! Core types for inner-map
//!
//! Domain types shared across all other crates: the interview transcript,
//! synthesized insights and the persisted journal record.

pub mod constants;
pub mod env_config;
mod error;
mod insight;
mod json_utils;
mod limits;
mod transcript;

pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use insight::*;
pub use json_utils::strip_markdown_json;
pub use limits::TurnLimits;
pub use transcript::*;
