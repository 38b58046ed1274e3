use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        feedback_service::FeedbackService,
        model_service::{ModelClient, OpenAiModelClient},
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub feedback_service: Arc<FeedbackService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let model = Arc::new(OpenAiModelClient::new(&config));
        Self::with_model_client(config, model)
    }

    /// Both endpoints share one stateless model client.
    pub fn with_model_client(config: Config, model: Arc<dyn ModelClient>) -> Self {
        Self {
            quiz_service: Arc::new(QuizService::new(Arc::clone(&model))),
            feedback_service: Arc::new(FeedbackService::new(model)),
            config: Arc::new(config),
        }
    }
}
