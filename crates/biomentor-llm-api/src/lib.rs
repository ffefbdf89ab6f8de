//! # biomentor-llm-api
//!
//! A small interface over hosted chat-completion APIs:
//! - Google Gemini (`generateContent`)
//! - OpenAI-compatible servers (OpenAI, Groq, llama.cpp)
//!
//! ## Example
//!
//! ```rust,no_run
//! use biomentor_llm_api::{ClientProvider, ClientSettings, LlmClient, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), biomentor_llm_api::LlmError> {
//!     let settings = ClientSettings::default();
//!     let client = settings.client_for("your-api-key")?;
//!
//!     let messages = vec![
//!         Message::system("You are Biology Mentor."),
//!         Message::human("What is a cell?"),
//!     ];
//!
//!     let reply = client.chat_completion(&messages).await?;
//!     println!("Response: {}", reply);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::{
    LlmClient,
    Message,
    gemini::GeminiClient,
    openai::OpenAiCompatibleClient,
};

pub use config::{
    BackendType,
    ClientFactory,
    ClientProvider,
    ClientSettings,
    GEMINI_API_URL,
    OPENAI_API_URL,
    DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT,
    normalize_api_url,
    parse_model_spec,
    get_default_url_for_backend,
};

pub use error::LlmError;
