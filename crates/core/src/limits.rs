use serde::Serialize;

use crate::{CoreError, DEFAULT_MAX_TURNS, DEFAULT_MIN_TURNS};

/// Minimum and maximum number of answered questions in one interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnLimits {
    min: usize,
    max: usize,
}

impl TurnLimits {
    /// # Errors
    /// Returns `CoreError::InvalidLimits` if `min` is zero or `max < min`.
    pub const fn new(min: usize, max: usize) -> Result<Self, CoreError> {
        if min == 0 || max < min {
            return Err(CoreError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Index of the last question that may be asked.
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.max.saturating_sub(1)
    }
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self { min: DEFAULT_MIN_TURNS, max: DEFAULT_MAX_TURNS }
    }
}
