use async_trait::async_trait;
use biomentor_logging::RequestLogging;
use biomentor_models::{ChatRequest, ChatRequestMessage, ChatResponse, Message};

use crate::client::{log_outgoing, read_response, LlmClient};
use crate::config::normalize_api_url;
use crate::error::LlmError;

/// Client for OpenAI-compatible chat completion servers (OpenAI, Groq, llama.cpp)
pub struct OpenAiCompatibleClient {
    api_key: String,
    model: String,
    url: String,
    temperature: Option<f32>,
    logging: RequestLogging,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: String, model: String, api_url: String) -> Self {
        Self {
            api_key,
            model,
            url: normalize_api_url(&api_url),
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

    pub fn build_chat_request(&self, messages: &[Message]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|message| ChatRequestMessage {
                    role: match message {
                        Message::System(_) => "system",
                        Message::Human(_) => "user",
                        Message::Ai(_) => "assistant",
                    }
                    .to_string(),
                    content: message.content().to_string(),
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: None,
            stream: false,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn chat_completion(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.build_chat_request(messages);
        let timestamp = log_outgoing(&self.url, &request, &self.api_key, &self.model, self.logging);

        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request);
        // llama.cpp servers run without a key
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await?;
        let body = read_response(response, self.logging, timestamp, &self.model).await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
