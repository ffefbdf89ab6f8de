use biomentor_chat::{outcome_kind, outcome_text, ChatSession, Outcome, ResponseGenerator, SessionError};
use biomentor_models::{TranscriptEntry, Turn};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::web::protocol::{ServerMessage, SessionDetails, SessionId, SessionInfo};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A turn opened on a session, waiting for its reply
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub user_text: String,
    /// Session history including this turn
    pub turns: Vec<Turn>,
    pub api_key: Option<String>,
    pub cancel: CancellationToken,
}

/// Cancellation handle of the reply being generated
#[derive(Debug)]
struct InFlight {
    /// WebSocket client that asked for the reply; `None` for HTTP submissions
    owner: Option<Uuid>,
    cancel: CancellationToken,
}

/// A client connection to a session
#[derive(Debug)]
pub struct ClientConnection {
    pub client_id: Uuid,
    pub ws_sender: mpsc::UnboundedSender<ServerMessage>,
    pub joined_at: DateTime<Utc>,
}

/// One browser tab's conversation
pub struct Session {
    pub id: SessionId,
    pub chat: Mutex<ChatSession>,
    pub clients: RwLock<Vec<ClientConnection>>,
    pub created_at: DateTime<Utc>,
    pub last_activity: Mutex<DateTime<Utc>>,
    in_flight: Mutex<Option<InFlight>>,
}

impl Session {
    pub fn new(id: SessionId, chat: ChatSession) -> Self {
        Self {
            id,
            chat: Mutex::new(chat),
            clients: RwLock::new(Vec::new()),
            created_at: Utc::now(),
            last_activity: Mutex::new(Utc::now()),
            in_flight: Mutex::new(None),
        }
    }

    pub async fn add_client(&self, client_id: Uuid, ws_sender: mpsc::UnboundedSender<ServerMessage>) {
        let conn = ClientConnection {
            client_id,
            ws_sender,
            joined_at: Utc::now(),
        };
        self.clients.write().await.push(conn);
        self.update_activity().await;
    }

    pub async fn remove_client(&self, client_id: Uuid) {
        self.clients.write().await.retain(|c| c.client_id != client_id);
        self.update_activity().await;
    }

    pub async fn broadcast(&self, message: ServerMessage) {
        let clients = self.clients.read().await;
        for client in clients.iter() {
            let _ = client.ws_sender.send(message.clone());
        }
    }

    pub async fn send_to_client(&self, client_id: Uuid, message: ServerMessage) {
        let clients = self.clients.read().await;
        if let Some(client) = clients.iter().find(|c| c.client_id == client_id) {
            let _ = client.ws_sender.send(message);
        }
    }

    pub async fn update_activity(&self) {
        *self.last_activity.lock().await = Utc::now();
    }

    pub async fn set_api_key(&self, api_key: Option<String>) -> bool {
        let mut chat = self.chat.lock().await;
        chat.set_api_key(api_key);
        let has_key = chat.has_api_key();
        drop(chat);

        self.update_activity().await;
        has_key
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.chat.lock().await.transcript_newest_first()
    }

    /// Open a turn for `content`. Fails while another reply is pending.
    ///
    /// The turn is cancellable as soon as this returns. `owner` is the
    /// WebSocket client whose departure should cancel it.
    pub async fn begin_turn(&self, content: String, owner: Option<Uuid>) -> Result<PendingTurn, SessionError> {
        let mut chat = self.chat.lock().await;
        chat.set_pending_input(content);
        let user_text = chat.take_pending_input().ok_or(SessionError::EmptyInput)?;
        chat.begin_turn(user_text.as_str())?;

        let cancel = CancellationToken::new();
        *self.in_flight.lock().await = Some(InFlight {
            owner,
            cancel: cancel.clone(),
        });
        let pending = PendingTurn {
            user_text,
            turns: chat.turns().to_vec(),
            api_key: chat.api_key().map(String::from),
            cancel,
        };
        drop(chat);

        self.update_activity().await;
        Ok(pending)
    }

    /// Generate the reply for an opened turn and store it on the session.
    ///
    /// The chat lock is not held while the model is called. The turn runs on
    /// its own task and always completes, even if the caller goes away.
    pub async fn finish_turn(
        self: &Arc<Self>,
        generator: &ResponseGenerator,
        pending: PendingTurn,
    ) -> Result<Outcome, SubmitError> {
        let session = Arc::clone(self);
        let generator = generator.clone();
        let task = tokio::spawn(async move {
            let outcome = generator
                .generate(&pending.turns, &pending.user_text, pending.api_key.as_deref(), &pending.cancel)
                .await;

            *session.in_flight.lock().await = None;
            session
                .chat
                .lock()
                .await
                .complete_turn(outcome_text(&outcome), outcome_kind(&outcome))?;
            session.update_activity().await;
            Ok::<_, SessionError>(outcome)
        });

        Ok(task.await??)
    }

    /// [`Session::begin_turn`] then [`Session::finish_turn`], not tied to any client
    pub async fn submit(
        self: &Arc<Self>,
        generator: &ResponseGenerator,
        content: String,
    ) -> Result<Outcome, SubmitError> {
        let pending = self.begin_turn(content, None).await?;
        self.finish_turn(generator, pending).await
    }

    /// Cancel the reply being generated, if any
    pub async fn cancel_generation(&self) -> bool {
        match self.in_flight.lock().await.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the reply being generated only if `client_id` asked for it
    pub async fn cancel_generation_for(&self, client_id: Uuid) -> bool {
        let mut in_flight = self.in_flight.lock().await;
        match in_flight.as_ref() {
            Some(current) if current.owner == Some(client_id) => {
                current.cancel.cancel();
                *in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub async fn get_info(&self, model: &str) -> SessionInfo {
        let chat = self.chat.lock().await;
        let clients = self.clients.read().await;
        let last_activity = *self.last_activity.lock().await;

        SessionInfo {
            id: self.id,
            created_at: self.created_at.to_rfc3339(),
            last_activity: last_activity.to_rfc3339(),
            active_clients: clients.len(),
            turn_count: chat.turns().len(),
            model: model.to_string(),
            has_api_key: chat.has_api_key(),
            phase: chat.phase(),
        }
    }

    pub async fn get_details(&self, model: &str) -> SessionDetails {
        SessionDetails {
            info: self.get_info(model).await,
            transcript: self.transcript().await,
        }
    }
}

/// Manages all active sessions
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    generator: ResponseGenerator,
    default_api_key: Option<String>,
}

impl SessionManager {
    pub fn new(generator: ResponseGenerator, default_api_key: Option<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            generator,
            default_api_key,
        }
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Create a session, seeded with `api_key` or the server default
    pub async fn create_session(&self, api_key: Option<String>) -> Arc<Session> {
        let session_id = Uuid::new_v4();
        let chat = ChatSession::with_api_key(api_key.or_else(|| self.default_api_key.clone()));
        let session = Arc::new(Session::new(session_id, chat));

        self.sessions.write().await.insert(session_id, session.clone());
        session
    }

    /// Get a session by ID
    pub async fn get_session(&self, session_id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// List all active sessions, most recently active first
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(sessions.len());

        for session in sessions {
            infos.push(session.get_info(self.generator.model()).await);
        }

        infos.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        infos
    }

    /// Discard a session, cancelling any reply in flight. Returns false for unknown ids.
    pub async fn remove_session(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.cancel_generation().await;
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
