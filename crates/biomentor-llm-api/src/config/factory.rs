use std::sync::Arc;
use std::time::Duration;

use biomentor_logging::RequestLogging;

use crate::client::{gemini::GeminiClient, openai::OpenAiCompatibleClient, LlmClient};
use crate::config::{get_default_url_for_backend, BackendType, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use crate::error::LlmError;

/// Everything needed to build a client except the credential
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub backend: BackendType,
    pub model: String,
    /// Custom API URL; the backend default is used when `None`
    pub api_url: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
    pub logging: RequestLogging,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend: BackendType::Gemini,
            model: DEFAULT_MODEL.to_string(),
            api_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            logging: RequestLogging::default(),
        }
    }
}

impl ClientSettings {
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| get_default_url_for_backend(self.backend))
    }
}

/// Builds a client for a given credential.
///
/// Sessions hold their own credential, so clients are created per call.
pub trait ClientProvider: Send + Sync {
    fn client_for(&self, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError>;

    /// Model the built clients talk to
    fn model(&self) -> &str;
}

impl ClientProvider for ClientSettings {
    fn client_for(&self, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
        ClientFactory::create(self, api_key.to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client for the configured backend
    ///
    /// # Arguments
    /// * `settings` - Backend, model, URL, temperature, timeout and logging switches
    /// * `api_key` - Credential for the backend
    ///
    /// # Returns
    /// Arc-wrapped LLM client implementing the LlmClient trait
    pub fn create(settings: &ClientSettings, api_key: String) -> Result<Arc<dyn LlmClient>, LlmError> {
        let http = build_http_client(settings.timeout)?;
        let url = settings.api_url().to_string();
        let model = settings.model.clone();

        let client: Arc<dyn LlmClient> = match settings.backend {
            BackendType::Gemini => Arc::new(
                GeminiClient::new(api_key, model, url)
                    .with_temperature(settings.temperature)
                    .with_logging(settings.logging)
                    .with_http_client(http),
            ),
            BackendType::OpenAI => Arc::new(
                OpenAiCompatibleClient::new(api_key, model, url)
                    .with_temperature(settings.temperature)
                    .with_logging(settings.logging)
                    .with_http_client(http),
            ),
        };

        Ok(client)
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("biomentor/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}
