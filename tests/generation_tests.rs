//! # Gemini Client Tests
//!
//! Runs the client against a local axum server standing in for the
//! `generateContent` endpoint.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use recipe_generator::errors::GenerationError;
use recipe_generator::generation::{GeminiClient, TextGenerator};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn spawn_server(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();

    let app = Router::new()
        .route(
            "/v1beta/models/:model_action",
            post(
                move |State(captured): State<Captured>,
                      Path(model_action): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured
                            .requests
                            .lock()
                            .unwrap()
                            .push((model_action, key, body));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

#[tokio::test]
async fn test_generate_sends_prompt_and_returns_text() {
    let reply = json!({
        "candidates": [{"content": {"parts": [{"text": "```json\n[]\n```"}], "role": "model"}}]
    });
    let (base, captured) = spawn_server(StatusCode::OK, reply).await;

    let client = GeminiClient::new("test-key", "gemini-2.5-flash").with_base_url(base);
    let text = client.generate("Make me dinner").await.unwrap();
    assert_eq!(text, "```json\n[]\n```");

    let requests = captured.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (model_action, key, body) = &requests[0];
    assert_eq!(model_action, "gemini-2.5-flash:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Make me dinner");
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let reply = json!({
        "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
    });
    let (base, _) = spawn_server(StatusCode::BAD_REQUEST, reply).await;

    let client = GeminiClient::new("bad-key", "gemini-2.5-flash").with_base_url(base);
    match client.generate("prompt").await {
        Err(GenerationError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_generation_error() {
    let (base, captured) = spawn_server(StatusCode::OK, json!({"candidates": []})).await;

    let client = GeminiClient::new("key", "gemini-2.5-flash").with_base_url(base);
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));

    // Exactly one attempt, no retry
    assert_eq!(captured.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_service_is_request_failure() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        GeminiClient::new("key", "gemini-2.5-flash").with_base_url(format!("http://{addr}"));
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::RequestFailed(_)));
}
