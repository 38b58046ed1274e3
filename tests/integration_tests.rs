use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use topic_quiz_server::{
    app_state::AppState,
    config::Config,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    models::domain::QuizItem,
    services::model_service::{ModelClient, ProviderError},
    session::{FeedbackOutcome, Phase, QuizFlow},
};

/// Replays canned model replies in order and records every prompt.
struct ScriptedModelClient {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModelClient {
    fn replying(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

macro_rules! test_app {
    ($model:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::with_model_client(
                    Config::default(),
                    $model,
                )))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status: StatusCode = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn questions_json(n: usize) -> String {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "question": format!("Question {}", i + 1),
                "options": ["A", "B", "C", "D"],
                "answer": i % 4
            })
        })
        .collect();
    Value::Array(items).to_string()
}

#[actix_web::test]
async fn generate_questions_returns_requested_count() {
    let model = ScriptedModelClient::replying(vec![Ok(questions_json(8))]);
    let app = test_app!(model.clone());

    let (status, body) = post_json!(
        app,
        "/api/generate-questions",
        json!({ "topic": "Astronomy", "count": 3 }),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quizzes"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["quizzes"][2]["question"], "Question 3");
    assert_eq!(body["quizzes"][0]["chosenAnswer"], Value::Null);
    assert!(model.prompts()[0].contains("exactly 3 multiple-choice questions"));
}

#[actix_web::test]
async fn count_defaults_to_five() {
    let model = ScriptedModelClient::replying(vec![Ok(questions_json(5))]);
    let app = test_app!(model.clone());

    let (status, body) =
        post_json!(app, "/api/generate-questions", json!({ "topic": "Astronomy", "count": "many" }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quizzes"].as_array().map(Vec::len), Some(5));
    assert!(model.prompts()[0].contains("Provide exactly 5 objects."));
}

#[actix_web::test]
async fn embedded_array_in_prose_is_extracted() {
    let raw = r#"Here you go: [{"question":"Q1","options":["A","B","C","D"],"answer":2}]"#;
    let model = ScriptedModelClient::replying(vec![Ok(raw.to_string())]);
    let app = test_app!(model);

    let (status, body) =
        post_json!(app, "/api/generate-questions", json!({ "topic": "Letters", "count": 1 }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "quizzes": [{
            "question": "Q1",
            "options": ["A", "B", "C", "D"],
            "answer": 2,
            "chosenAnswer": null
        }]})
    );
}

#[actix_web::test]
async fn prose_without_array_is_bad_gateway() {
    let model = ScriptedModelClient::replying(vec![Ok("I'd rather talk about cats.".to_string())]);
    let app = test_app!(model);

    let (status, body) = post_json!(app, "/api/generate-questions", json!({ "topic": "Dogs" }));

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "Parse error: non-JSON output" }));
}

#[actix_web::test]
async fn object_output_is_not_an_array() {
    let model = ScriptedModelClient::replying(vec![Ok(r#"{"quizzes": []}"#.to_string())]);
    let app = test_app!(model);

    let (status, body) = post_json!(app, "/api/generate-questions", json!({ "topic": "Dogs" }));

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Parse error: not an array");
}

#[actix_web::test]
async fn provider_failure_is_bad_gateway() {
    let model = ScriptedModelClient::replying(vec![Err(ProviderError::Timeout(60))]);
    let app = test_app!(model);

    let (status, body) = post_json!(app, "/api/generate-questions", json!({ "topic": "Dogs" }));

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("Upstream error"));
}

#[actix_web::test]
async fn blank_topic_is_client_error_without_upstream_call() {
    let model = ScriptedModelClient::replying(vec![Ok(questions_json(5))]);
    let app = test_app!(model.clone());

    for body in [json!({ "topic": "" }), json!({ "topic": "   " }), json!({ "count": 3 })] {
        let (status, body) = post_json!(app, "/api/generate-questions", body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Validation error: Missing topic" }));
    }

    assert!(model.prompts().is_empty());
}

#[actix_web::test]
async fn non_string_topic_is_client_error() {
    let model = ScriptedModelClient::replying(vec![]);
    let app = test_app!(model.clone());

    let (status, _) = post_json!(app, "/api/generate-questions", json!({ "topic": 42 }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(model.prompts().is_empty());
}

#[actix_web::test]
async fn feedback_is_returned_verbatim() {
    let model = ScriptedModelClient::replying(vec![Ok("Great work!\n\nRevisit orbits.".to_string())]);
    let app = test_app!(model.clone());

    let (status, body) = post_json!(
        app,
        "/api/generate-feedback",
        json!({
            "topic": "Astronomy",
            "quizzes": [
                { "question": "Closest star?", "options": ["Sun", "Vega", "Sirius", "Rigel"], "answer": 0, "chosenAnswer": 0 },
                { "question": "Red planet?", "options": ["Venus", "Mars", "Jupiter", "Saturn"], "answer": 1, "chosenAnswer": null }
            ]
        }),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "Great work!\n\nRevisit orbits." }));

    let prompts = model.prompts();
    let prompt = &prompts[0];
    assert!(prompt.contains("Closest star?"));
    assert!(prompt.contains("Chosen: Sun"));
    assert!(prompt.contains("Chosen: not answered"));
    assert!(prompt.contains("Correct: Mars"));
}

#[actix_web::test]
async fn feedback_items_are_repaired_before_grading() {
    let model = ScriptedModelClient::replying(vec![Ok("Keep going.".to_string())]);
    let app = test_app!(model.clone());

    let (status, body) = post_json!(
        app,
        "/api/generate-feedback",
        json!({
            "topic": "Astronomy",
            "quizzes": [
                { "question": "Out of range", "options": ["w", "x", "y", "z"], "answer": 9, "chosenAnswer": 9 },
                { "question": "Short options", "options": ["Moon", "Sun"], "answer": -1, "chosenAnswer": 0 }
            ]
        }),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "Keep going." }));

    let prompts = model.prompts();
    let prompt = &prompts[0];
    assert!(prompt.contains("scored 1/2"));
    assert!(prompt.contains("1. Out of range\n   Chosen: not answered\n   Correct: w\n   Result: incorrect"));
    assert!(prompt.contains("2. Short options\n   Chosen: Moon\n   Correct: Moon\n   Result: correct"));
    assert!(!prompt.contains("unknown"));
}

#[actix_web::test]
async fn feedback_without_content_is_bad_gateway() {
    let model = ScriptedModelClient::replying(vec![Ok("   ".to_string())]);
    let app = test_app!(model);

    let (status, body) = post_json!(
        app,
        "/api/generate-feedback",
        json!({
            "topic": "Astronomy",
            "quizzes": [{ "question": "Q", "options": ["a", "b", "c", "d"], "answer": 0 }]
        }),
    );

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn feedback_requires_topic_and_items() {
    let model = ScriptedModelClient::replying(vec![]);
    let app = test_app!(model.clone());

    let (status, _) = post_json!(app, "/api/generate-feedback", json!({ "topic": "Astronomy" }));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json!(
        app,
        "/api/generate-feedback",
        json!({ "quizzes": [{ "question": "Q", "options": ["a", "b", "c", "d"], "answer": 0 }] }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(model.prompts().is_empty());
}

#[actix_web::test]
async fn responses_carry_request_id() {
    let app = test_app!(ScriptedModelClient::replying(vec![]));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}

#[actix_rt::test]
async fn full_session_round_trip() {
    let model = ScriptedModelClient::replying(vec![
        Ok(questions_json(2)),
        Ok("Solid effort.".to_string()),
    ]);
    let app = test_app!(model);
    let mut flow = QuizFlow::new();

    let ticket = flow.submit_topic("Math").unwrap();
    let (_, body) = post_json!(app, "/api/generate-questions", json!({ "topic": ticket.topic, "count": 2 }));
    let items: Vec<QuizItem> = serde_json::from_value(body["quizzes"].clone()).unwrap();
    assert!(flow.apply_questions(&ticket, Ok(items)));

    // first item answer is 0, second is 1
    assert!(flow.select_answer(0));
    assert!(flow.advance().is_none());
    assert!(flow.select_answer(2));
    let feedback_ticket = flow.advance().expect("finishing should request feedback");
    assert_eq!(flow.phase(), &Phase::Completing);

    let (status, body) = post_json!(
        app,
        "/api/generate-feedback",
        json!({ "topic": feedback_ticket.topic, "quizzes": flow.items() }),
    );
    assert_eq!(status, StatusCode::OK);
    let text = body["feedback"].as_str().unwrap().to_string();
    assert!(flow.apply_feedback(&feedback_ticket, Ok(text)));

    assert_eq!(flow.correct_count(), 1);
    assert_eq!(flow.answered_count(), 2);
    assert!(matches!(flow.feedback(), Some(FeedbackOutcome::Ready(f)) if f.text == "Solid effort."));

    flow.restart();
    assert_eq!(flow.phase(), &Phase::Idle);
    assert!(flow.items().is_empty());
}
