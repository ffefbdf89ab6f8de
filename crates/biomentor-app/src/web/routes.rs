use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use biomentor_chat::{outcome_kind, outcome_text, Outcome, SessionError};
use colored::Colorize;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::web::{
    protocol::{
        ClientMessage, CreateSessionRequest, MessageResponse, SendMessageRequest, ServerMessage,
        SessionDetails, SessionId, SetApiKeyRequest,
    },
    session_manager::{Session, SessionManager, SubmitError},
};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:id", get(get_session_details).delete(close_session))
        .route("/api/sessions/:id/api-key", put(set_api_key))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/ws/:session_id", get(websocket_handler))
        .route("/", get(serve_index))
        .with_state(state)
}

async fn find_session(state: &AppState, id: &SessionId) -> Result<Arc<Session>, AppError> {
    state
        .session_manager
        .get_session(id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))
}

/// GET /api/sessions - List all active sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.session_manager.list_sessions().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// POST /api/sessions - Create a new session
async fn create_session(
    State(state): State<AppState>,
    payload: Option<Json<CreateSessionRequest>>,
) -> Json<serde_json::Value> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let session = state.session_manager.create_session(request.api_key).await;
    println!("{} Session created: {}", "🆕".green(), session.id);

    Json(serde_json::json!({
        "session_id": session.id,
        "created_at": session.created_at.to_rfc3339(),
        "websocket_url": format!("/ws/{}", session.id),
    }))
}

/// GET /api/sessions/:id - Session info and transcript
async fn get_session_details(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionDetails>, AppError> {
    let session = find_session(&state, &id).await?;
    let model = state.session_manager.generator().model().to_string();
    Ok(Json(session.get_details(&model).await))
}

/// DELETE /api/sessions/:id - Close a session
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.session_manager.remove_session(&id).await {
        return Err(AppError::NotFound("Session not found".into()));
    }
    println!("{} Session closed: {}", "🗑️".bright_black(), id);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Session closed successfully",
    })))
}

/// PUT /api/sessions/:id/api-key - Set or clear the session credential
async fn set_api_key(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SetApiKeyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = find_session(&state, &id).await?;
    let has_api_key = session.set_api_key(request.api_key).await;
    session.broadcast(ServerMessage::ApiKeyUpdated { has_api_key }).await;

    Ok(Json(serde_json::json!({ "has_api_key": has_api_key })))
}

/// POST /api/sessions/:id/messages - Submit a question and wait for the reply
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = find_session(&state, &id).await?;
    let outcome = run_turn(&state, &session, request.content, None).await?;

    Ok(Json(MessageResponse {
        reply: outcome_text(&outcome),
        kind: outcome_kind(&outcome),
        transcript: session.transcript().await,
    }))
}

/// Submit on behalf of any surface and keep connected sockets in sync.
/// `owner` is the WebSocket client that asked, if any.
async fn run_turn(
    state: &AppState,
    session: &Arc<Session>,
    content: String,
    owner: Option<Uuid>,
) -> Result<Outcome, SubmitError> {
    let pending = session.begin_turn(content, owner).await?;
    session
        .broadcast(ServerMessage::TurnStarted {
            user_text: pending.user_text.clone(),
        })
        .await;

    let outcome = session.finish_turn(state.session_manager.generator(), pending).await?;
    let kind = outcome_kind(&outcome);
    println!("💬 Session {}: turn completed ({})", session.id, kind.as_str());

    session
        .broadcast(ServerMessage::AssistantMessage {
            content: outcome_text(&outcome),
            kind,
        })
        .await;
    session
        .broadcast(ServerMessage::Transcript {
            entries: session.transcript().await,
        })
        .await;

    Ok(outcome)
}

/// GET /ws/:session_id - WebSocket endpoint
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Response, AppError> {
    let session = find_session(&state, &session_id).await?;
    Ok(ws.on_upgrade(move |socket| handle_websocket(socket, state, session)))
}

/// Handle WebSocket connection
async fn handle_websocket(socket: WebSocket, state: AppState, session: Arc<Session>) {
    let client_id = Uuid::new_v4();

    let (ws_sender, mut ws_receiver) = mpsc::unbounded_channel();
    session.add_client(client_id, ws_sender).await;
    greet_client(client_id, &session, &state).await;

    let (mut ws_sink, mut ws_stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sink.send(WsMessage::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(Ok(msg)) = ws_stream.next().await {
        if let WsMessage::Text(text) = msg {
            handle_text(client_id, &text, &session, &state).await;
        }
    }

    client_left(client_id, &session).await;
    send_task.abort();
}

/// Send the `SessionJoined` greeting to a newly connected client
async fn greet_client(client_id: Uuid, session: &Session, state: &AppState) {
    let (has_api_key, transcript) = {
        let chat = session.chat.lock().await;
        (chat.has_api_key(), chat.transcript_newest_first())
    };
    let join_msg = ServerMessage::SessionJoined {
        session_id: session.id,
        created_at: session.created_at.to_rfc3339(),
        model: state.session_manager.generator().model().to_string(),
        has_api_key,
        transcript,
    };
    session.send_to_client(client_id, join_msg).await;
}

/// Parse one text frame and dispatch it
async fn handle_text(client_id: Uuid, text: &str, session: &Arc<Session>, state: &AppState) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_msg) => handle_client_message(client_id, client_msg, session, state).await,
        Err(e) => {
            eprintln!("{} Failed to parse message: {} - Error: {}", "❌".red(), text, e);
            let error_msg = ServerMessage::Error {
                message: format!("Invalid message: {}", e),
                recoverable: true,
            };
            session.send_to_client(client_id, error_msg).await;
        }
    }
}

/// Drop a closed socket, cancelling the reply it was waiting for
async fn client_left(client_id: Uuid, session: &Session) {
    if session.cancel_generation_for(client_id).await {
        println!("{} Session {}: client left, generation cancelled", "⏹️".yellow(), session.id);
    }
    session.remove_client(client_id).await;
}

/// Handle a message from a client
async fn handle_client_message(client_id: Uuid, message: ClientMessage, session: &Arc<Session>, state: &AppState) {
    match message {
        ClientMessage::SendMessage { content } => {
            // Keep the reader free so CancelGeneration can arrive mid-turn
            let session = Arc::clone(session);
            let state = state.clone();
            tokio::spawn(async move {
                if let Err(e) = run_turn(&state, &session, content, Some(client_id)).await {
                    let error_msg = ServerMessage::Error {
                        message: e.to_string(),
                        recoverable: true,
                    };
                    session.send_to_client(client_id, error_msg).await;
                }
            });
        }
        ClientMessage::SetApiKey { api_key } => {
            let has_api_key = session.set_api_key(api_key).await;
            session.broadcast(ServerMessage::ApiKeyUpdated { has_api_key }).await;
        }
        ClientMessage::CancelGeneration => {
            if !session.cancel_generation().await {
                let error_msg = ServerMessage::Error {
                    message: "No reply is being generated".to_string(),
                    recoverable: true,
                };
                session.send_to_client(client_id, error_msg).await;
            }
        }
    }
}

/// GET / - Serve the chat widget
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyInput => AppError::BadRequest(err.to_string()),
            SessionError::ReplyPending | SessionError::NoPendingTurn => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Session(e) => e.into(),
            SubmitError::Task(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
