pub mod feedback_service;
pub mod model_service;
pub mod quiz_service;
pub mod response_parser;
