use async_trait::async_trait;
use biomentor_logging::RequestLogging;
use biomentor_models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Message};

use crate::client::{log_outgoing, read_response, LlmClient};
use crate::error::LlmError;

/// Google Gemini client using the REST `generateContent` endpoint
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    logging: RequestLogging,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        // Accept both "gemini-pro" and "models/gemini-pro"
        let model = model.trim_start_matches("models/").to_string();
        Self {
            api_key,
            model,
            base_url,
            temperature: None,
            logging: RequestLogging::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_logging(mut self, logging: RequestLogging) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn get_generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Map the neutral transcript onto a Gemini request.
///
/// System messages are merged into `systemInstruction`; human and AI turns
/// become `user` and `model` contents in order.
pub fn build_generate_request(messages: &[Message], temperature: Option<f32>) -> GenerateContentRequest {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut contents = Vec::with_capacity(messages.len());

    for message in messages {
        match message {
            Message::System(text) => system_parts.push(text),
            Message::Human(text) => contents.push(Content::text(Some("user"), text.as_str())),
            Message::Ai(text) => contents.push(Content::text(Some("model"), text.as_str())),
        }
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(Content::text(None, system_parts.join("\n\n")))
    };

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: temperature.map(|temperature| GenerationConfig {
            temperature: Some(temperature),
            max_output_tokens: None,
        }),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat_completion(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = build_generate_request(messages, self.temperature);
        if request.contents.is_empty() {
            return Err(LlmError::Provider("no user message to send".to_string()));
        }

        let url = self.get_generate_url();
        let timestamp = log_outgoing(&url, &request, &self.api_key, &self.model, self.logging);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = read_response(response, self.logging, timestamp, &self.model).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
