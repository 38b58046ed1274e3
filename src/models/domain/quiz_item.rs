use serde::{Deserialize, Serialize};

use crate::constants::OPTIONS_PER_QUESTION;

/// A single multiple-choice question as presented to the user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub question: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub answer: usize,
    #[serde(default)]
    pub chosen_answer: Option<usize>,
}

impl QuizItem {
    /// Builds an unanswered item. An out-of-range `answer` is coerced to 0.
    pub fn new(
        question: impl Into<String>,
        options: [String; OPTIONS_PER_QUESTION],
        answer: usize,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: if answer < OPTIONS_PER_QUESTION { answer } else { 0 },
            chosen_answer: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.chosen_answer.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.chosen_answer == Some(self.answer)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer).map(String::as_str)
    }

    /// Text of the chosen option, if one was chosen and it is in range.
    pub fn chosen_option(&self) -> Option<&str> {
        self.chosen_answer
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Records the user's choice, overwriting any earlier one.
    pub fn choose(&mut self, option: usize) -> bool {
        if option >= OPTIONS_PER_QUESTION {
            return false;
        }
        self.chosen_answer = Some(option);
        true
    }
}
