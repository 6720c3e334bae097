//! Adaptive interview controller.
//!
//! The controller is a plain state machine: operations that need a new
//! question return a [`FetchTicket`], the caller runs it against a
//! [`QuestionProvider`] and hands the outcome back to
//! [`QuestionFlow::apply_fetch`]. Each ticket carries a generation; results
//! for any generation other than the one currently awaited are dropped.

use inner_map_core::{
    QUESTION_UNAVAILABLE_MESSAGE, Transcript, TurnLimits, draft_from_answer, resolve_answer,
};
use inner_map_llm::{LlmError, QuestionProvider};
use serde::Serialize;

use crate::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    AwaitingFirstQuestion,
    Interviewing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    Opening,
    Next,
}

/// A question request issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    transcript: Transcript,
}

impl FetchTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn kind(&self) -> FetchKind {
        self.kind
    }

    /// Transcript snapshot the question should follow.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Ask `asker` for the question this ticket stands for.
    pub async fn run<A: QuestionProvider + ?Sized>(&self, asker: &A) -> Result<String, LlmError> {
        match self.kind {
            FetchKind::Opening => asker.start_conversation().await,
            FetchKind::Next => asker.next_question(&self.transcript).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchState {
    Idle,
    Loading { generation: u64, kind: FetchKind },
    Failed { kind: FetchKind, message: String },
}

/// Serializable view of the controller for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSnapshot {
    pub phase: FlowPhase,
    pub question_number: usize,
    pub min_questions: usize,
    pub max_questions: usize,
    pub question: Option<String>,
    pub draft: String,
    pub answered: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub can_go_back: bool,
    pub can_finish: bool,
    pub must_finish: bool,
}

#[derive(Debug)]
pub struct QuestionFlow {
    transcript: Transcript,
    /// Pair index of the question being answered.
    cursor: usize,
    draft: String,
    phase: FlowPhase,
    fetch: FetchState,
    generation: u64,
    limits: TurnLimits,
}

impl QuestionFlow {
    /// Start an interview. The returned ticket fetches the opening question.
    #[must_use]
    pub fn new(limits: TurnLimits) -> (Self, FetchTicket) {
        let mut flow = Self {
            transcript: Transcript::new(),
            cursor: 0,
            draft: String::new(),
            phase: FlowPhase::AwaitingFirstQuestion,
            fetch: FetchState::Idle,
            generation: 0,
            limits,
        };
        let ticket = flow.issue_fetch(FetchKind::Opening);
        (flow, ticket)
    }

    fn issue_fetch(&mut self, kind: FetchKind) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.fetch = FetchState::Loading { generation: self.generation, kind };
        FetchTicket { generation: self.generation, kind, transcript: self.transcript.clone() }
    }

    /// Feed back the outcome of a ticket. Returns `false` if the ticket was
    /// stale and the result was discarded.
    pub fn apply_fetch(&mut self, generation: u64, result: Result<String, LlmError>) -> bool {
        let awaited = matches!(self.fetch, FetchState::Loading { generation: g, .. } if g == generation);
        if !awaited || self.phase == FlowPhase::Completed {
            tracing::debug!(generation, current = self.generation, "discarding stale question fetch");
            return false;
        }
        let FetchState::Loading { kind, .. } = self.fetch else {
            return false;
        };

        match result {
            Ok(question) => {
                let pair = self.transcript.push_question(question);
                tracing::debug!(pair, "question received");
                self.fetch = FetchState::Idle;
                if self.phase == FlowPhase::AwaitingFirstQuestion {
                    self.phase = FlowPhase::Interviewing;
                }
                self.load_draft();
            },
            Err(e) => {
                tracing::warn!(error = %e, ?kind, "question fetch failed");
                self.fetch =
                    FetchState::Failed { kind, message: QUESTION_UNAVAILABLE_MESSAGE.to_owned() };
            },
        }
        true
    }

    /// Run `ticket` against `asker` and apply the outcome.
    pub async fn fetch<A: QuestionProvider + ?Sized>(&mut self, ticket: FetchTicket, asker: &A) -> bool {
        let result = ticket.run(asker).await;
        self.apply_fetch(ticket.generation, result)
    }

    /// Re-issue the request that last failed.
    pub fn retry(&mut self) -> Result<FetchTicket, FlowError> {
        self.ensure_active()?;
        match self.fetch {
            FetchState::Failed { kind, .. } => Ok(self.issue_fetch(kind)),
            _ => Err(FlowError::NothingToRetry),
        }
    }

    fn ensure_active(&self) -> Result<(), FlowError> {
        if self.phase == FlowPhase::Completed {
            return Err(FlowError::Completed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), FlowError> {
        self.ensure_active()?;
        if self.is_fetching() {
            return Err(FlowError::Busy);
        }
        Ok(())
    }

    fn load_draft(&mut self) {
        self.draft = self.transcript.answer(self.cursor).map(draft_from_answer).unwrap_or_default();
    }

    fn clear_failure(&mut self) {
        if matches!(self.fetch, FetchState::Failed { .. }) {
            self.fetch = FetchState::Idle;
        }
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_active()?;
        self.draft = draft.into();
        Ok(())
    }

    /// Record `answer` (or the skip sentinel when blank) for the current
    /// question, overwriting an earlier answer in place.
    pub fn submit_or_skip(&mut self, answer: &str) -> Result<(), FlowError> {
        self.ensure_active()?;
        if self.transcript.question(self.cursor).is_none() {
            return Err(FlowError::NoQuestion);
        }
        let resolved = resolve_answer(answer);
        self.draft = draft_from_answer(&resolved);
        self.transcript.set_answer(self.cursor, resolved)?;
        Ok(())
    }

    /// Move to the next question. Returns a ticket when the next question has
    /// not been asked yet.
    pub fn advance(&mut self) -> Result<Option<FetchTicket>, FlowError> {
        self.ensure_idle()?;
        if self.transcript.answer(self.cursor).is_none() {
            return Err(FlowError::Unanswered);
        }
        if self.cursor >= self.limits.last_index() {
            return Err(FlowError::AtLastQuestion);
        }

        self.cursor = self.cursor.saturating_add(1);
        self.clear_failure();
        self.load_draft();
        let at_frontier = self.transcript.question(self.cursor).is_none();
        if at_frontier && self.transcript.question_count() < self.limits.max() {
            return Ok(Some(self.issue_fetch(FetchKind::Next)));
        }
        Ok(None)
    }

    /// Save the draft and step back one question. No-op on the first question.
    pub fn retreat(&mut self) -> Result<(), FlowError> {
        self.ensure_idle()?;
        if self.cursor == 0 {
            return Ok(());
        }
        if self.transcript.question(self.cursor).is_some() {
            let draft = std::mem::take(&mut self.draft);
            self.submit_or_skip(&draft)?;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.clear_failure();
        self.load_draft();
        Ok(())
    }

    /// Whether the interview may end on the current question.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        self.phase == FlowPhase::Interviewing
            && !self.is_fetching()
            && self.transcript.question(self.cursor).is_some()
            && (self.transcript.answer_count() >= self.finish_threshold()
                || self.cursor >= self.limits.last_index())
    }

    fn finish_threshold(&self) -> usize {
        self.limits.min().saturating_sub(1)
    }

    /// Save the draft and hand off the completed transcript.
    pub fn finish(&mut self) -> Result<Transcript, FlowError> {
        self.ensure_idle()?;
        if !self.can_finish() {
            if self.transcript.question(self.cursor).is_none() {
                return Err(FlowError::NoQuestion);
            }
            return Err(FlowError::FinishNotAllowed {
                answered: self.transcript.answer_count(),
                required: self.finish_threshold(),
            });
        }
        let draft = std::mem::take(&mut self.draft);
        self.submit_or_skip(&draft)?;

        self.phase = FlowPhase::Completed;
        self.generation = self.generation.wrapping_add(1);
        self.fetch = FetchState::Idle;
        tracing::info!(answers = self.transcript.answer_count(), "interview complete");
        Ok(std::mem::take(&mut self.transcript))
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Loading { .. })
    }

    /// User-displayable message for the last failed fetch.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        match &self.fetch {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> FlowPhase {
        self.phase
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&str> {
        self.transcript.question(self.cursor)
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn limits(&self) -> TurnLimits {
        self.limits
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        let active = self.phase != FlowPhase::Completed && !self.is_fetching();
        FlowSnapshot {
            phase: self.phase,
            question_number: self.cursor.saturating_add(1),
            min_questions: self.limits.min(),
            max_questions: self.limits.max(),
            question: self.current_question().map(str::to_owned),
            draft: self.draft.clone(),
            answered: self.transcript.answer_count(),
            loading: self.is_fetching(),
            error: self.last_error().map(str::to_owned),
            can_go_back: active && self.cursor > 0,
            can_finish: self.can_finish(),
            must_finish: self.cursor >= self.limits.last_index(),
        }
    }
}
