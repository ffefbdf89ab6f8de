use thiserror::Error;

/// Failure of a single chat completion call.
///
/// `Display` yields the bare provider message; callers add their own prefix.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("the model returned no text")]
    EmptyResponse,

    #[error("{0}")]
    Provider(String),
}

impl LlmError {
    /// True for transport timeouts raised by the HTTP client
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Http(e) if e.is_timeout())
    }

    /// True when the provider rejected the credential.
    /// Gemini reports a bad key as 400 INVALID_ARGUMENT.
    pub fn is_auth(&self) -> bool {
        match self {
            LlmError::Api { status, message } => {
                *status == 401 || *status == 403 || message.contains("API key not valid")
            }
            _ => false,
        }
    }
}
