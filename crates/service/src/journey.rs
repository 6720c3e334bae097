//! One user's path through the app: screen, running interview, latest
//! insight and the entry being viewed.

use std::sync::Arc;

use inner_map_core::{InsightRecord, SYNTHESIS_FAILED_MESSAGE, TurnLimits, now_millis};
use inner_map_llm::QuestionProvider;
use serde::Serialize;

use crate::{
    DashboardTab, FlowSnapshot, InsightSynthesizer, JournalService, QuestionFlow, ServiceError,
    View, ViewEvent,
};

/// Everything a front end needs to draw the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct JourneySnapshot {
    pub view: View,
    pub interview: Option<FlowSnapshot>,
    /// Insight produced by the last interview.
    pub current: Option<InsightRecord>,
    /// Journal entry open on the detail screen.
    pub entry: Option<InsightRecord>,
    pub error: Option<String>,
}

pub struct Journey {
    view: View,
    flow: Option<QuestionFlow>,
    current: Option<InsightRecord>,
    entry: Option<InsightRecord>,
    error: Option<String>,
    limits: TurnLimits,
    asker: Arc<dyn QuestionProvider>,
    synthesizer: InsightSynthesizer,
    journal: JournalService,
}

impl Journey {
    /// Open on the dashboard if anything has been journaled, else on welcome.
    pub async fn launch(
        limits: TurnLimits,
        asker: Arc<dyn QuestionProvider>,
        synthesizer: InsightSynthesizer,
        journal: JournalService,
    ) -> Self {
        let view = View::initial(!journal.is_empty().await);
        tracing::debug!(?view, "journey launched");
        Self {
            view,
            flow: None,
            current: None,
            entry: None,
            error: None,
            limits,
            asker,
            synthesizer,
            journal,
        }
    }

    /// Begin a new interview and fetch its opening question.
    ///
    /// A failed fetch is not an error here; it shows up in the interview
    /// snapshot and can be retried.
    pub async fn start(&mut self) -> Result<(), ServiceError> {
        self.view = self.view.transition(ViewEvent::Start)?;
        self.error = None;
        self.current = None;
        self.entry = None;

        let (mut flow, ticket) = QuestionFlow::new(self.limits);
        flow.fetch(ticket, self.asker.as_ref()).await;
        self.flow = Some(flow);
        Ok(())
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) -> Result<(), ServiceError> {
        let flow = self.flow.as_mut().ok_or(ServiceError::NoInterview)?;
        flow.set_draft(draft)?;
        Ok(())
    }

    /// Record `answer` for the current question and move on, fetching the
    /// next question when it has not been asked yet.
    pub async fn answer(&mut self, answer: &str) -> Result<(), ServiceError> {
        let flow = self.flow.as_mut().ok_or(ServiceError::NoInterview)?;
        flow.submit_or_skip(answer)?;
        if let Some(ticket) = flow.advance()? {
            flow.fetch(ticket, self.asker.as_ref()).await;
        }
        Ok(())
    }

    pub async fn skip(&mut self) -> Result<(), ServiceError> {
        self.answer("").await
    }

    /// Step back one question. A `Some` draft replaces the one kept for the
    /// current question; `None` leaves it as it was.
    pub fn previous(&mut self, draft: Option<String>) -> Result<(), ServiceError> {
        let flow = self.flow.as_mut().ok_or(ServiceError::NoInterview)?;
        if let Some(draft) = draft {
            flow.set_draft(draft)?;
        }
        flow.retreat()?;
        Ok(())
    }

    pub async fn retry(&mut self) -> Result<(), ServiceError> {
        let flow = self.flow.as_mut().ok_or(ServiceError::NoInterview)?;
        let ticket = flow.retry()?;
        flow.fetch(ticket, self.asker.as_ref()).await;
        Ok(())
    }

    /// End the interview, synthesize the insight and journal it.
    ///
    /// On synthesis failure the journey returns to the welcome screen with a
    /// fixed message and nothing is persisted.
    pub async fn finish(&mut self, answer: Option<&str>) -> Result<InsightRecord, ServiceError> {
        let flow = self.flow.as_mut().ok_or(ServiceError::NoInterview)?;
        let generating = self.view.transition(ViewEvent::TranscriptComplete)?;
        if let Some(answer) = answer {
            flow.set_draft(answer)?;
        }
        let transcript = flow.finish()?;
        self.flow = None;
        self.view = generating;

        match self.synthesizer.synthesize(transcript).await {
            Ok(draft) => {
                let record = self.journal.record(draft, now_millis()).await;
                self.view = self.view.transition(ViewEvent::SynthesisSucceeded)?;
                self.current = Some(record.clone());
                Ok(record)
            },
            Err(e) => {
                tracing::error!(error = %e, "insight synthesis failed");
                self.view = self.view.transition(ViewEvent::SynthesisFailed)?;
                self.error = Some(SYNTHESIS_FAILED_MESSAGE.to_owned());
                Err(e)
            },
        }
    }

    /// Open journal entry `id` on the detail screen.
    pub async fn select_entry(&mut self, id: i64) -> Result<InsightRecord, ServiceError> {
        let record = self
            .journal
            .get_session(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("journal entry {id}")))?;
        self.view = self.view.transition(ViewEvent::SelectEntry)?;
        self.entry = Some(record.clone());
        Ok(record)
    }

    pub fn open_dashboard(&mut self, tab: DashboardTab) -> Result<(), ServiceError> {
        self.view = self.view.transition(ViewEvent::OpenDashboard(tab))?;
        self.entry = None;
        self.error = None;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), ServiceError> {
        self.view = self.view.transition(ViewEvent::Back)?;
        self.entry = None;
        Ok(())
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub const fn flow(&self) -> Option<&QuestionFlow> {
        self.flow.as_ref()
    }

    #[must_use]
    pub const fn current(&self) -> Option<&InsightRecord> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn journal(&self) -> &JournalService {
        &self.journal
    }

    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        JourneySnapshot {
            view: self.view,
            interview: self.flow.as_ref().map(QuestionFlow::snapshot),
            current: self.current.clone(),
            entry: self.entry.clone(),
            error: self.error.clone(),
        }
    }
}
