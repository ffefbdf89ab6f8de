use async_trait::async_trait;

use crate::error::LlmError;

pub mod gemini;
pub mod openai;

pub use biomentor_models::Message;

/// LLM client trait - one non-streaming completion per call
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the whole conversation and return the reply text
    async fn chat_completion(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// Provider-native model identifier
    fn model(&self) -> &str;
}

/// Read a provider response body, logging it when requested.
/// Non-2xx statuses become [`LlmError::Api`] with the provider's own message.
pub(crate) async fn read_response(
    response: reqwest::Response,
    logging: biomentor_logging::RequestLogging,
    request_timestamp: Option<i64>,
    model: &str,
) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    biomentor_logging::log_response(status, &body, logging.verbose);
    if let Some(timestamp) = request_timestamp {
        if let Err(e) = biomentor_logging::log_response_to_file(status, &body, timestamp, model) {
            eprintln!("Failed to log response: {}", e);
        }
    }

    if !status.is_success() {
        let message = serde_json::from_str::<biomentor_models::ProviderErrorWrapper>(&body)
            .ok()
            .and_then(|wrapper| wrapper.describe())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body.clone()
                }
            });
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// Log an outgoing request; returns the file-log timestamp when file logging is on
pub(crate) fn log_outgoing<T: serde::Serialize>(
    url: &str,
    request: &T,
    api_key: &str,
    model: &str,
    logging: biomentor_logging::RequestLogging,
) -> Option<i64> {
    biomentor_logging::log_request(url, request, api_key, logging.verbose);
    if !logging.to_file {
        return None;
    }
    match biomentor_logging::log_request_to_file(url, request, model, api_key) {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            eprintln!("Failed to log request: {}", e);
            None
        }
    }
}
