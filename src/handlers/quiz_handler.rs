use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{FeedbackRequest, GenerateFeedbackRequest, GenerateQuestionsRequest, QuestionRequest},
        response::{FeedbackResponse, QuizzesResponse},
    },
};

const MAX_BODY_BYTES: usize = 256 * 1024;

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            AppError::ValidationError(format!("Invalid request body: {}", err)).into()
        })
}

fn log_failure(request_id: &str, err: AppError) -> AppError {
    match &err {
        AppError::ValidationError(_) => log::warn!("[{}] {}: {}", request_id, err.error_code(), err),
        _ => log::error!("[{}] {}: {}", request_id, err.error_code(), err),
    }
    err
}

#[post("/api/generate-questions")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();

    let request = QuestionRequest::try_from(body.into_inner())
        .map_err(|e| log_failure(&request_id, e))?;

    log::info!(
        "[{}] Generating {} questions for '{}'",
        request_id,
        request.count,
        request.topic
    );

    let quizzes = state
        .quiz_service
        .generate_questions(&request)
        .await
        .map_err(|e| log_failure(&request_id, e))?;

    log::info!("[{}] Returning {} questions", request_id, quizzes.len());
    Ok(HttpResponse::Ok().json(QuizzesResponse { quizzes }))
}

#[post("/api/generate-feedback")]
pub async fn generate_feedback(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<GenerateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();

    let request = FeedbackRequest::try_from(body.into_inner())
        .map_err(|e| log_failure(&request_id, e))?;

    log::info!(
        "[{}] Generating feedback for '{}' ({} items)",
        request_id,
        request.topic,
        request.items.len()
    );

    let feedback = state
        .feedback_service
        .generate_feedback(&request)
        .await
        .map_err(|e| log_failure(&request_id, e))?;

    Ok(HttpResponse::Ok().json(FeedbackResponse::from(feedback)))
}
