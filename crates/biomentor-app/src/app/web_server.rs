use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::app::AppConfig;
use crate::cli::Cli;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(cli: &Cli, app_config: AppConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.bind, cli.port))?;

    println!("🌐 Starting Biology Mentor web server...");
    println!("   Address: {}", addr);

    let config = WebServerConfig {
        bind_addr: addr,
        generator: app_config.generator,
        default_api_key: app_config.chat.default_api_key,
    };

    WebServer::new(config).start().await
}
