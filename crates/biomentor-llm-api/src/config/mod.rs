use std::time::Duration;

pub mod factory;
pub use factory::{ClientFactory, ClientProvider, ClientSettings};

/// Backend type for chat models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Gemini,
    OpenAI,
}

impl BackendType {
    /// Parse backend type from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" | "genai" => Some(Self::Gemini),
            "openai" | "groq" | "llama" | "llamacpp" | "llama.cpp" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
        }
    }

    /// Guess the backend from an API URL
    pub fn detect_from_url(url: &str) -> Self {
        if url.contains("googleapis") || url.contains("gemini") {
            Self::Gemini
        } else {
            Self::OpenAI
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default Gemini API base URL
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for the tutor
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default bound on a single remote call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Get the default URL for a given backend type
pub fn get_default_url_for_backend(backend: BackendType) -> &'static str {
    match backend {
        BackendType::Gemini => GEMINI_API_URL,
        BackendType::OpenAI => OPENAI_API_URL,
    }
}

/// Parse a model string in format "model@backend(api_url)", "model@backend" or "model".
/// Returns (model_name, backend, api_url)
pub fn parse_model_spec(spec: &str) -> (String, Option<BackendType>, Option<String>) {
    let (model, backend_part) = match spec.split_once('@') {
        Some((model, rest)) => (model, Some(rest)),
        None => (spec, None),
    };

    let mut backend = None;
    let mut api_url = None;
    if let Some(backend_part) = backend_part {
        match backend_part.split_once('(') {
            Some((name, rest)) => {
                backend = BackendType::from_str(name);
                let url = rest.strip_suffix(')').unwrap_or(rest);
                if !url.is_empty() {
                    api_url = Some(url.to_string());
                }
            }
            None => backend = BackendType::from_str(backend_part),
        }
    }

    (model.to_string(), backend, api_url)
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") {
        return url.to_string();
    }

    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        format!("{}/chat/completions", trimmed)
    } else {
        format!("{}/v1/chat/completions", trimmed)
    }
}
