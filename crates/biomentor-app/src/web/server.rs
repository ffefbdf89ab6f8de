use anyhow::{Context, Result};
use axum::Router;
use biomentor_chat::ResponseGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::web::{routes, session_manager::SessionManager};

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub generator: ResponseGenerator,
    /// Credential given to sessions that do not bring their own
    pub default_api_key: Option<String>,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    session_manager: Arc<SessionManager>,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: WebServerConfig) -> Self {
        let session_manager = Arc::new(SessionManager::new(
            config.generator.clone(),
            config.default_api_key.clone(),
        ));

        Self {
            config,
            session_manager,
        }
    }

    /// Router with the CORS layer applied
    pub fn router(&self) -> Router {
        let app_state = routes::AppState {
            session_manager: self.session_manager.clone(),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(app_state).layer(cors)
    }

    /// Start the web server and run until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let app = self.router();

        println!("🌐 Web server starting on http://{}", self.config.bind_addr);
        println!("   WebSocket endpoint: ws://{}/ws/{{session_id}}", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/sessions", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        println!("👋 Web server stopped");
        Ok(())
    }

    pub fn session_manager(&self) -> Arc<SessionManager> {
        self.session_manager.clone()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
