use std::sync::Arc;

use crate::{
    constants::prompts::question_generation_prompt,
    errors::AppResult,
    models::{domain::QuizItem, dto::request::QuestionRequest},
    services::{
        model_service::{non_empty, ModelClient},
        response_parser::parse_quiz_items,
    },
};

pub struct QuizService {
    model: Arc<dyn ModelClient>,
}

impl QuizService {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Asks the model for `request.count` questions on `request.topic`.
    ///
    /// Output that cannot be read as a JSON array is an error, never an empty
    /// list. The result may hold fewer items than requested.
    pub async fn generate_questions(&self, request: &QuestionRequest) -> AppResult<Vec<QuizItem>> {
        let prompt = question_generation_prompt(&request.topic, request.count);

        let raw = self
            .model
            .generate(&prompt)
            .await
            .and_then(non_empty)
            .map_err(|e| {
                log::error!("Question generation for '{}' failed: {}", request.topic, e);
                e
            })?;

        let items = parse_quiz_items(&raw, request.count).map_err(|e| {
            log::error!("Failed to parse model output ({}), raw: {}", e, raw);
            e
        })?;

        if items.len() < request.count {
            log::warn!(
                "Model returned {} of {} requested questions for '{}'",
                items.len(),
                request.count,
                request.topic
            );
        }

        Ok(items)
    }
}
