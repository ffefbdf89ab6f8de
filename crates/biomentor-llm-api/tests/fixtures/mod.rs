#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const GEMINI_PATH: &str = "/models/gemini-pro:generateContent";
pub const OPENAI_PATH: &str = "/v1/chat/completions";

/// Mock server utilities for testing chat API clients
pub struct LLMMockServer {
    server: MockServer,
}

impl LLMMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mock successful Gemini response, checking the key header and a partial body
    pub async fn mock_gemini_success(&self, expected_body: Value, response_text: &str) {
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .and(body_partial_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(response_text)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock Gemini response with no usable candidate
    pub async fn mock_gemini_blocked(&self) {
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }],
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock Gemini error envelope
    pub async fn mock_gemini_error(&self, status: u16, error_status: &str, message: &str) {
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "code": status,
                    "message": message,
                    "status": error_status
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a plain-text failure on any path
    pub async fn mock_plain_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a Gemini reply that arrives after `delay`
    pub async fn mock_gemini_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_body("too late"))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock successful OpenAI-compatible response
    pub async fn mock_openai_success(&self, expected_body: Value, response_text: &str) {
        Mock::given(method("POST"))
            .and(path(OPENAI_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl_test123",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": response_text },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock OpenAI-style error envelope
    pub async fn mock_openai_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(OPENAI_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": message, "type": "invalid_request_error" }
            })))
            .mount(&self.server)
            .await;
    }
}

pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 30, "totalTokenCount": 42 }
    })
}
