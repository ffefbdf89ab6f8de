use std::sync::Arc;
use std::time::Duration;

use biomentor_llm_api::{ClientProvider, LlmError, DEFAULT_TIMEOUT};
use biomentor_models::{ReplyKind, Turn};
use biomentor_policy::{TopicDecision, TopicPolicy};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::history::{build_message_list, DEFAULT_PERSONA};
use crate::session::{ChatSession, SessionError};

/// Prefix put in front of every failure shown in the transcript
pub const ERROR_PREFIX: &str = "An error occurred while generating the response: ";

/// Reply stored when no credential has been entered
pub const MISSING_API_KEY_PROMPT: &str = "Please enter a valid API key.";

/// Text produced for a turn without an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Model output
    Answer(String),
    /// Local off-topic refusal; the model was not called
    Refusal(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) | Reply::Refusal(text) => text,
        }
    }

    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Answer(_) => ReplyKind::Answer,
            Reply::Refusal(_) => ReplyKind::Refusal,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("generation was cancelled")]
    Cancelled,

    #[error(transparent)]
    Remote(#[from] LlmError),
}

impl GenerateError {
    /// String stored as the turn's reply
    pub fn display_text(&self) -> String {
        match self {
            GenerateError::MissingCredential => MISSING_API_KEY_PROMPT.to_string(),
            other => format!("{}{}", ERROR_PREFIX, other),
        }
    }
}

pub type Outcome = Result<Reply, GenerateError>;

pub fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Ok(reply) => reply.text().to_string(),
        Err(e) => e.display_text(),
    }
}

pub fn outcome_kind(outcome: &Outcome) -> ReplyKind {
    match outcome {
        Ok(reply) => reply.kind(),
        Err(_) => ReplyKind::Error,
    }
}

/// Turns a user question into a reply: topic gate, credential check, then
/// one remote call bounded by a timeout and a cancellation token.
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn ClientProvider>,
    topic: TopicPolicy,
    persona: String,
    timeout: Duration,
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn ClientProvider>, topic: TopicPolicy) -> Self {
        Self {
            provider,
            topic,
            persona: DEFAULT_PERSONA.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn topic(&self) -> &TopicPolicy {
        &self.topic
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Produce the reply for `user_text`.
    ///
    /// `turns` must already end with the pending turn for `user_text`.
    pub async fn generate(
        &self,
        turns: &[Turn],
        user_text: &str,
        api_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Outcome {
        if let TopicDecision::Reject = self.topic.evaluate(user_text) {
            return Ok(Reply::Refusal(self.topic.refusal().to_string()));
        }

        let api_key = match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => return Err(GenerateError::MissingCredential),
        };

        let messages = build_message_list(&self.persona, turns);
        let client = self.provider.client_for(api_key)?;

        tokio::select! {
            _ = cancel.cancelled() => Err(GenerateError::Cancelled),
            result = tokio::time::timeout(self.timeout, client.chat_completion(&messages)) => {
                match result {
                    Err(_) => Err(GenerateError::Timeout(self.timeout)),
                    Ok(Err(e)) if e.is_timeout() => Err(GenerateError::Timeout(self.timeout)),
                    Ok(Err(e)) => Err(GenerateError::Remote(e)),
                    Ok(Ok(text)) => Ok(Reply::Answer(text)),
                }
            }
        }
    }

    /// Run one submission against a session held exclusively by the caller:
    /// take the pending input, open the turn, generate, store the reply.
    ///
    /// Returns `Ok(None)` when there was no pending input.
    pub async fn respond(
        &self,
        session: &mut ChatSession,
        cancel: &CancellationToken,
    ) -> Result<Option<Outcome>, SessionError> {
        let Some(user_text) = session.take_pending_input() else {
            return Ok(None);
        };
        session.begin_turn(user_text.as_str())?;

        let outcome = self
            .generate(session.turns(), &user_text, session.api_key(), cancel)
            .await;
        session.complete_turn(outcome_text(&outcome), outcome_kind(&outcome))?;

        Ok(Some(outcome))
    }
}
