pub mod prompts;

/// Every quiz item carries exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

pub const DEFAULT_QUESTION_COUNT: usize = 5;

pub const UNTITLED_QUESTION: &str = "Untitled question";
pub const NOT_ANSWERED: &str = "not answered";
