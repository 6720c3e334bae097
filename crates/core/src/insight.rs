//! Synthesized insights and the persisted journal record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, FIRST_MILESTONE_REASON, PATTERN_COUNT, Transcript};

/// Icon drawn next to an identified pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternIcon {
    Shield,
    Seedling,
    Path,
    Heart,
    Anchor,
    Lightbulb,
}

impl PatternIcon {
    pub const ALL: [Self; 6] =
        [Self::Shield, Self::Seedling, Self::Path, Self::Heart, Self::Anchor, Self::Lightbulb];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shield => "Shield",
            Self::Seedling => "Seedling",
            Self::Path => "Path",
            Self::Heart => "Heart",
            Self::Anchor => "Anchor",
            Self::Lightbulb => "Lightbulb",
        }
    }
}

impl std::fmt::Display for PatternIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatternIcon {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| CoreError::UnknownIcon(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub icon_kind: PatternIcon,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicMap {
    pub title: String,
    pub description: String,
    /// Displayable image handle, a `data:` URL for generated images.
    pub image_reference: String,
}

/// A synthesized insight that has not been timestamped or stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDraft {
    pub reflection: String,
    pub poem: String,
    pub patterns: [Pattern; PATTERN_COUNT],
    pub symbolic_map: SymbolicMap,
    pub is_milestone: bool,
    pub milestone_reason: Option<String>,
    pub transcript: Transcript,
}

/// One journal entry: the stored outcome of a completed interview.
///
/// `created_at` has millisecond precision and doubles as the record's
/// identity and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRecord {
    pub reflection: String,
    pub poem: String,
    pub patterns: [Pattern; PATTERN_COUNT],
    pub symbolic_map: SymbolicMap,
    pub is_milestone: bool,
    #[serde(default)]
    pub milestone_reason: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub transcript: Transcript,
}

impl InsightRecord {
    #[must_use]
    pub fn from_draft(draft: InsightDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            reflection: draft.reflection,
            poem: draft.poem,
            patterns: draft.patterns,
            symbolic_map: draft.symbolic_map,
            is_milestone: draft.is_milestone,
            milestone_reason: draft.milestone_reason,
            created_at: created_at.trunc_subsecs(3),
            transcript: draft.transcript,
        }
    }

    /// Millisecond timestamp identifying this record.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.created_at.timestamp_millis()
    }

    /// Flag this record as the start of the journey, replacing whatever
    /// milestone verdict synthesis produced.
    pub fn mark_first_milestone(&mut self) {
        self.is_milestone = true;
        self.milestone_reason = Some(FIRST_MILESTONE_REASON.to_owned());
    }
}

/// Current time truncated to the millisecond precision records are stored at.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
