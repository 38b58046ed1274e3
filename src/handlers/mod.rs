pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

pub use health_handler::health_check;
pub use quiz_handler::{generate_feedback, generate_questions, json_config};

/// Registers every route plus the JSON extractor config that reports
/// malformed bodies in the common error shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(generate_questions)
        .service(generate_feedback)
        .service(health_check);
}
