//! Shared constants for inner-map.

/// Answer recorded for a question the respondent chose not to answer.
pub const SKIP_SENTINEL: &str = "I chose to skip this question.";

/// Default minimum number of answers before an interview may be finished.
pub const DEFAULT_MIN_TURNS: usize = 3;

/// Default hard cap on answers in one interview.
pub const DEFAULT_MAX_TURNS: usize = 7;

/// Storage key holding the serialized journal.
pub const JOURNAL_KEY: &str = "innerMapJournal";

/// Milestone reason stamped on the first record ever saved.
pub const FIRST_MILESTONE_REASON: &str =
    "The beginning of your journey. This marks your first step into self-reflection.";

/// Shown in place of a question when the asker could not be reached.
pub const QUESTION_UNAVAILABLE_MESSAGE: &str =
    "I seem to be lost for words. Please try again in a moment.";

/// Shown on the welcome screen when insight synthesis fails.
pub const SYNTHESIS_FAILED_MESSAGE: &str =
    "Sorry, an error occurred while creating your reflection. Please try starting a new journey.";

/// Number of patterns every insight carries.
pub const PATTERN_COUNT: usize = 3;
