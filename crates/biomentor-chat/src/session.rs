use biomentor_models::{ReplyKind, TranscriptEntry, Turn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a reply is still being generated")]
    ReplyPending,
    #[error("message is empty")]
    EmptyInput,
    #[error("no message is waiting for a reply")]
    NoPendingTurn,
}

/// Where a session is in its per-turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingInput,
    AwaitingResponse,
}

/// In-memory state of one conversation.
///
/// Turns are append-only. Only the last turn can be missing its reply, and
/// only while the session is `AwaitingResponse`.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
    pending_input: Option<String>,
    api_key: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: Option<String>) -> Self {
        let mut session = Self::new();
        session.set_api_key(api_key);
        session
    }

    /// Store the next message to submit, replacing any previous one
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = Some(text.into());
    }

    /// Take the pending message, clearing the slot. Blank input reads as `None`.
    pub fn take_pending_input(&mut self) -> Option<String> {
        self.pending_input
            .take()
            .filter(|text| !text.trim().is_empty())
    }

    /// Append a turn awaiting its reply and return its index
    pub fn begin_turn(&mut self, user_text: impl Into<String>) -> Result<usize, SessionError> {
        if self.phase() == TurnPhase::AwaitingResponse {
            return Err(SessionError::ReplyPending);
        }
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.turns.push(Turn::new(user_text));
        Ok(self.turns.len() - 1)
    }

    /// Attach the reply to the pending turn
    pub fn complete_turn(&mut self, reply: impl Into<String>, kind: ReplyKind) -> Result<(), SessionError> {
        match self.turns.last_mut() {
            Some(turn) if turn.is_pending() => {
                turn.reply = Some(reply.into());
                turn.kind = kind;
                Ok(())
            }
            _ => Err(SessionError::NoPendingTurn),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        match self.turns.last() {
            Some(turn) if turn.is_pending() => TurnPhase::AwaitingResponse,
            _ => TurnPhase::AwaitingInput,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// User messages in the order they were sent
    pub fn past_inputs(&self) -> Vec<&str> {
        self.turns.iter().map(|turn| turn.user_text.as_str()).collect()
    }

    /// Replies in the order they were produced
    pub fn generated_responses(&self) -> Vec<&str> {
        self.turns
            .iter()
            .filter_map(|turn| turn.reply.as_deref())
            .collect()
    }

    /// Answered turns as (reply, user message) pairs, newest first
    pub fn transcript_newest_first(&self) -> Vec<TranscriptEntry> {
        self.turns
            .iter()
            .rev()
            .filter_map(|turn| {
                turn.reply.as_ref().map(|reply| TranscriptEntry {
                    reply: reply.clone(),
                    user_text: turn.user_text.clone(),
                    kind: turn.kind,
                })
            })
            .collect()
    }

    /// Set or clear the credential. Blank keys count as absent.
    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
