use std::sync::Arc;

use crate::{
    constants::prompts::feedback_prompt,
    errors::AppResult,
    models::{domain::FeedbackResult, dto::request::FeedbackRequest},
    services::model_service::{non_empty, ModelClient},
};

pub struct FeedbackService {
    model: Arc<dyn ModelClient>,
}

impl FeedbackService {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Returns the model's prose verbatim; feedback is never parsed.
    pub async fn generate_feedback(&self, request: &FeedbackRequest) -> AppResult<FeedbackResult> {
        let prompt = feedback_prompt(&request.topic, &request.items);

        let text = self
            .model
            .generate(&prompt)
            .await
            .and_then(non_empty)
            .map_err(|e| {
                log::error!("Feedback generation for '{}' failed: {}", request.topic, e);
                e
            })?;

        Ok(FeedbackResult::new(text))
    }
}
