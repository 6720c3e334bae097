//! Top-level screen sequencing as an explicit transition function.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    #[default]
    Journal,
    Evolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    Welcome,
    Interviewing,
    Generating,
    Results,
    Dashboard { tab: DashboardTab },
    /// Detail of one journal entry; `Back` returns to `return_tab`.
    SessionDetail { return_tab: DashboardTab },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Start,
    TranscriptComplete,
    SynthesisSucceeded,
    SynthesisFailed,
    SelectEntry,
    OpenDashboard(DashboardTab),
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} on the {from:?} screen")]
pub struct InvalidTransition {
    pub from: View,
    pub event: ViewEvent,
}

impl View {
    /// Launch screen: the dashboard once anything has been journaled.
    #[must_use]
    pub const fn initial(has_sessions: bool) -> Self {
        if has_sessions { Self::Dashboard { tab: DashboardTab::Journal } } else { Self::Welcome }
    }

    /// # Errors
    /// Returns `InvalidTransition` when `event` is not accepted on this screen.
    pub fn transition(self, event: ViewEvent) -> Result<Self, InvalidTransition> {
        use ViewEvent as E;

        let next = match (self, event) {
            (
                Self::Welcome | Self::Results | Self::Dashboard { .. } | Self::SessionDetail { .. },
                E::Start,
            ) => Self::Interviewing,
            (Self::Interviewing, E::TranscriptComplete) => Self::Generating,
            (Self::Generating, E::SynthesisSucceeded) => Self::Results,
            (Self::Generating, E::SynthesisFailed) => Self::Welcome,
            (Self::Results, E::SelectEntry) => Self::SessionDetail { return_tab: DashboardTab::Journal },
            (Self::Dashboard { tab }, E::SelectEntry) => Self::SessionDetail { return_tab: tab },
            (Self::SessionDetail { return_tab }, E::Back) => Self::Dashboard { tab: return_tab },
            (
                Self::Welcome | Self::Results | Self::Dashboard { .. } | Self::SessionDetail { .. },
                E::OpenDashboard(tab),
            ) => Self::Dashboard { tab },
            (from, event) => {
                tracing::debug!(?from, ?event, "rejected view transition");
                return Err(InvalidTransition { from, event });
            },
        };
        Ok(next)
    }
}
