use serde::Serialize;

use crate::models::domain::{FeedbackResult, QuizItem};

#[derive(Debug, Serialize)]
pub struct QuizzesResponse {
    pub quizzes: Vec<QuizItem>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

impl From<FeedbackResult> for FeedbackResponse {
    fn from(result: FeedbackResult) -> Self {
        FeedbackResponse {
            feedback: result.text,
        }
    }
}
