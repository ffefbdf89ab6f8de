use biomentor_chat::{ReplyKind, TurnPhase};
use biomentor_models::TranscriptEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session ID type
pub type SessionId = Uuid;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// `None` or a blank key clears the credential
    SetApiKey {
        #[serde(default)]
        api_key: Option<String>,
    },
    SendMessage { content: String },
    CancelGeneration,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    SessionJoined {
        session_id: SessionId,
        created_at: String,
        model: String,
        has_api_key: bool,
        transcript: Vec<TranscriptEntry>,
    },
    TurnStarted {
        user_text: String,
    },
    AssistantMessage {
        content: String,
        kind: ReplyKind,
    },
    ApiKeyUpdated {
        has_api_key: bool,
    },
    Transcript {
        entries: Vec<TranscriptEntry>,
    },
    Error {
        message: String,
        recoverable: bool,
    },
}

/// Session information for listing
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: String,
    pub last_activity: String,
    pub active_clients: usize,
    pub turn_count: usize,
    pub model: String,
    pub has_api_key: bool,
    pub phase: TurnPhase,
}

/// GET /api/sessions/:id body
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub info: SessionInfo,
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetApiKeyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/sessions/:id/messages body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub kind: ReplyKind,
    pub transcript: Vec<TranscriptEntry>,
}
