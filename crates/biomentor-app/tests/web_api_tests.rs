use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use biomentor::app::setup::build_generator;
use biomentor::web::{WebServer, WebServerConfig};
use biomentor::ChatConfig;
use biomentor_chat::DEFAULT_PERSONA;
use biomentor_llm_api::{BackendType, ClientSettings};
use biomentor_policy::{TopicPolicy, OFF_TOPIC_REFUSAL};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Nothing listens here, so any request that escapes the gate fails fast
const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

fn router_for(api_url: &str, default_api_key: Option<&str>) -> Router {
    let chat = ChatConfig {
        client: ClientSettings {
            backend: BackendType::Gemini,
            model: "gemini-pro".to_string(),
            api_url: Some(api_url.to_string()),
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
        persona: DEFAULT_PERSONA.to_string(),
        topic: TopicPolicy::new(),
        default_api_key: default_api_key.map(String::from),
    };

    WebServer::new(WebServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        generator: build_generator(&chat),
        default_api_key: chat.default_api_key.clone(),
    })
    .router()
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = call(app, "POST", "/api/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_and_fetch_session() {
    let app = router_for(UNREACHABLE_URL, None);
    let id = create_session(&app).await;

    let (status, body) = call(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["has_api_key"], json!(false));
    assert_eq!(body["phase"], json!("awaiting_input"));
    assert_eq!(body["transcript"], json!([]));

    let (_, list) = call(&app, "GET", "/api/sessions", None).await;
    assert_eq!(list["sessions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_session_without_body() {
    let app = router_for(UNREACHABLE_URL, None);
    let (status, body) = call(&app, "POST", "/api/sessions", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["websocket_url"].as_str().unwrap().starts_with("/ws/"));
}

#[tokio::test]
async fn test_off_topic_question_is_refused_locally() {
    let app = router_for(UNREACHABLE_URL, Some("server-key"));
    let id = create_session(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({"content": "Who won the football game?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], json!("refusal"));
    assert_eq!(body["reply"], json!(OFF_TOPIC_REFUSAL));
    assert_eq!(
        body["transcript"],
        json!([{"reply": OFF_TOPIC_REFUSAL, "user_text": "Who won the football game?", "kind": "refusal"}])
    );
}

#[tokio::test]
async fn test_missing_key_yields_prompt() {
    let app = router_for(UNREACHABLE_URL, None);
    let id = create_session(&app).await;

    let (_, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({"content": "What is a cell?"})),
    )
    .await;

    assert_eq!(body["kind"], json!("error"));
    assert_eq!(body["reply"], json!("Please enter a valid API key."));
}

#[tokio::test]
async fn test_every_transcript_entry_keeps_its_kind() {
    let app = router_for(UNREACHABLE_URL, None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/messages", id);

    call(&app, "POST", &uri, Some(json!({"content": "Who won the football game?"}))).await;
    let (_, body) = call(&app, "POST", &uri, Some(json!({"content": "What is a cell?"}))).await;

    let kinds: Vec<&str> = body["transcript"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["error", "refusal"]);
}

#[tokio::test]
async fn test_answer_from_model_with_session_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(header("x-goog-api-key", "session-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "What is a cell?"}]}],
            "systemInstruction": {"parts": [{"text": DEFAULT_PERSONA}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "The basic unit of life."}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server.uri(), None);
    let id = create_session(&app).await;

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/sessions/{}/api-key", id),
        Some(json!({"api_key": "session-key"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"has_api_key": true}));

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({"content": "What is a cell?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], json!("answer"));
    assert_eq!(body["reply"], json!("The basic unit of life."));
}

#[tokio::test]
async fn test_remote_failure_is_reported_inline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let app = router_for(&server.uri(), Some("bad-key"));
    let id = create_session(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({"content": "Explain photosynthesis"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], json!("error"));
    assert!(body["reply"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred while generating the response: "));

    let (_, details) = call(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(details["phase"], json!("awaiting_input"));
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = router_for(UNREACHABLE_URL, None);
    let id = create_session(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({"content": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(400));
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = router_for(UNREACHABLE_URL, None);
    let missing = "00000000-0000-4000-8000-000000000000";

    let (status, body) = call(&app, "GET", &format!("/api/sessions/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Session not found"));

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", missing),
        Some(json!({"content": "What is DNA?"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let app = router_for(UNREACHABLE_URL, None);
    let id = create_session(&app).await;

    let (status, body) = call(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, _) = call(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_serves_widget() {
    let app = router_for(UNREACHABLE_URL, None);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Enter your Google Gemini API Key"));
}
