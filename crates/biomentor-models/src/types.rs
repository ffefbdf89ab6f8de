use serde::{Deserialize, Deserializer, Serialize};

/// Speaker of a message in the provider-neutral transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "human",
            Role::Ai => "ai",
        }
    }
}

/// One message handed to a chat backend.
///
/// Serializes as `{"role": "...", "content": "..."}` so the same shape is used
/// on the web protocol and in request logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    Human(String),
    Ai(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human(content.into())
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai(content.into())
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System(_) => Role::System,
            Message::Human(_) => Role::Human,
            Message::Ai(_) => Role::Ai,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(text) | Message::Human(text) | Message::Ai(text) => text,
        }
    }
}

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// How a reply came about, used to style it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Model output
    #[default]
    Answer,
    /// Local off-topic refusal
    Refusal,
    /// Credential prompt or a failed call
    Error,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyKind::Answer => "answer",
            ReplyKind::Refusal => "refusal",
            ReplyKind::Error => "error",
        }
    }
}

/// A user message and the reply it produced.
///
/// `reply` stays `None` only while the reply is being generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user_text: String,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub kind: ReplyKind,
}

impl Turn {
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            reply: None,
            kind: ReplyKind::default(),
        }
    }

    pub fn answered(user_text: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            reply: Some(reply.into()),
            kind: ReplyKind::Answer,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.reply.is_none()
    }
}

/// A rendered (AI reply, user message) bubble pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub reply: String,
    pub user_text: String,
    pub kind: ReplyKind,
}
