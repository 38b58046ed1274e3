use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::constants::DEFAULT_QUESTION_COUNT;
use crate::errors::AppError;
use crate::models::domain::QuizItem;
use crate::services::response_parser::normalize_answered_item;

/// Body of `POST /api/generate-questions` as sent by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub count: Option<Value>,
}

/// Body of `POST /api/generate-feedback` as sent by the browser. Items are
/// kept loose and repaired into [`QuizItem`]s on conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateFeedbackRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub quizzes: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(range(min = 1, max = 20))]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(length(min = 1, max = 20))]
    pub items: Vec<QuizItem>,
}

impl TryFrom<GenerateQuestionsRequest> for QuestionRequest {
    type Error = AppError;

    fn try_from(dto: GenerateQuestionsRequest) -> Result<Self, Self::Error> {
        let request = QuestionRequest {
            topic: required_topic(dto.topic)?,
            count: resolve_count(dto.count.as_ref()),
        };
        request.validate()?;
        Ok(request)
    }
}

impl TryFrom<GenerateFeedbackRequest> for FeedbackRequest {
    type Error = AppError;

    fn try_from(dto: GenerateFeedbackRequest) -> Result<Self, Self::Error> {
        let topic = required_topic(dto.topic)?;
        if dto.quizzes.is_empty() {
            return Err(AppError::ValidationError("No quizzes to review".to_string()));
        }

        let request = FeedbackRequest {
            topic,
            items: dto.quizzes.iter().map(normalize_answered_item).collect(),
        };
        request.validate()?;
        Ok(request)
    }
}

fn required_topic(topic: Option<String>) -> Result<String, AppError> {
    topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::ValidationError("Missing topic".to_string()))
}

/// Numbers and numeric strings are floored; anything absent, non-numeric or
/// below one falls back to the default count.
pub fn resolve_count(count: Option<&Value>) -> usize {
    let numeric = match count {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    numeric
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.floor() as usize)
        .unwrap_or(DEFAULT_QUESTION_COUNT)
}
