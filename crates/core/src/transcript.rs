//! Interview transcript: alternating asker/respondent turns paired by index.

use serde::{Deserialize, Serialize};

use crate::{CoreError, SKIP_SENTINEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Asker,
    Respondent,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asker => "asker",
            Self::Respondent => "respondent",
        }
    }
}

/// One utterance in the interview.
///
/// `pair_index` ties an answer to the question it responds to and is fixed
/// when the turn is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub pair_index: usize,
}

impl Turn {
    #[must_use]
    pub fn question(pair_index: usize, content: impl Into<String>) -> Self {
        Self { role: Role::Asker, content: content.into(), pair_index }
    }

    #[must_use]
    pub fn answer(pair_index: usize, content: impl Into<String>) -> Self {
        Self { role: Role::Respondent, content: content.into(), pair_index }
    }
}

/// Ordered sequence of turns for one interview.
///
/// An answer always sits directly after the question with the same
/// `pair_index`, so a respondent turn can never precede its question and two
/// respondent turns are never adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.count_role(Role::Asker)
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.count_role(Role::Respondent)
    }

    fn count_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    fn question_position(&self, pair: usize) -> Option<usize> {
        self.turns.iter().position(|t| t.role == Role::Asker && t.pair_index == pair)
    }

    #[must_use]
    pub fn question(&self, pair: usize) -> Option<&str> {
        self.question_position(pair)
            .and_then(|pos| self.turns.get(pos))
            .map(|t| t.content.as_str())
    }

    #[must_use]
    pub fn answer(&self, pair: usize) -> Option<&str> {
        let pos = self.question_position(pair)?;
        self.turns
            .get(pos.saturating_add(1))
            .filter(|t| t.role == Role::Respondent && t.pair_index == pair)
            .map(|t| t.content.as_str())
    }

    /// Append a new question and return its pair index.
    pub fn push_question(&mut self, content: impl Into<String>) -> usize {
        let pair = self.question_count();
        self.turns.push(Turn::question(pair, content));
        pair
    }

    /// Record the answer to question `pair`, overwriting an earlier answer in
    /// place so later turns keep their positions.
    ///
    /// # Errors
    /// Returns `CoreError::UnaskedQuestion` if question `pair` does not exist.
    pub fn set_answer(&mut self, pair: usize, content: impl Into<String>) -> Result<(), CoreError> {
        let pos = self.question_position(pair).ok_or(CoreError::UnaskedQuestion { pair })?;
        let answer_pos = pos.saturating_add(1);
        let answered = self
            .turns
            .get(answer_pos)
            .is_some_and(|t| t.role == Role::Respondent && t.pair_index == pair);
        if !answered {
            self.turns.insert(answer_pos, Turn::answer(pair, content));
        } else if let Some(turn) = self.turns.get_mut(answer_pos) {
            turn.content = content.into();
        }
        Ok(())
    }

    /// Respondent turns in conversation order.
    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().filter(|t| t.role == Role::Respondent).map(|t| t.content.as_str())
    }

    /// Pair indices of questions that have no answer yet.
    #[must_use]
    pub fn unanswered(&self) -> Vec<usize> {
        self.turns
            .iter()
            .filter(|t| t.role == Role::Asker && self.answer(t.pair_index).is_none())
            .map(|t| t.pair_index)
            .collect()
    }

    /// Whether questions are numbered `0..n` in order and every answer
    /// directly follows its own question.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut next_question = 0_usize;
        let mut previous: Option<&Turn> = None;
        for turn in &self.turns {
            match turn.role {
                Role::Asker => {
                    if turn.pair_index != next_question {
                        return false;
                    }
                    next_question = next_question.saturating_add(1);
                },
                Role::Respondent => {
                    let paired = previous
                        .is_some_and(|p| p.role == Role::Asker && p.pair_index == turn.pair_index);
                    if !paired {
                        return false;
                    }
                },
            }
            previous = Some(turn);
        }
        true
    }
}

/// Effective answer for a submitted draft: trimmed text, or the skip sentinel
/// when nothing was written.
#[must_use]
pub fn resolve_answer(draft: &str) -> String {
    let trimmed = draft.trim();
    if trimmed.is_empty() { SKIP_SENTINEL.to_owned() } else { trimmed.to_owned() }
}

/// Draft text shown when revisiting an answer; a skipped question shows blank.
#[must_use]
pub fn draft_from_answer(answer: &str) -> String {
    if answer == SKIP_SENTINEL { String::new() } else { answer.to_owned() }
}
