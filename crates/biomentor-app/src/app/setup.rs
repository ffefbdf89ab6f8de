use anyhow::Result;
use biomentor_chat::ResponseGenerator;
use colored::Colorize;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::{ChatConfig, FileConfig};

/// Application configuration derived from CLI arguments, environment and config file
pub struct AppConfig {
    pub chat: ChatConfig,
    pub generator: ResponseGenerator,
}

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let file = match &cli.config {
        Some(path) => {
            let file = FileConfig::load_from_file(path)?;
            eprintln!("{} Loaded config file: {}", "📋".cyan(), path.display());
            file
        }
        None => FileConfig::default(),
    };

    let chat = ChatConfig::resolve(cli, file)?;

    eprintln!(
        "{} Model: {} via {} ({})",
        "🧬".cyan(),
        chat.client.model,
        chat.client.backend,
        chat.client.api_url()
    );
    if !chat.topic.is_enabled() {
        eprintln!("{} Topic gate disabled - every question goes to the model", "⚠️".yellow());
    }
    if chat.default_api_key.is_none() {
        eprintln!("{} No default API key - each session must enter one", "🔑".yellow());
    }
    if chat.client.logging.to_file {
        eprintln!("{} Request logging to ~/.biomentor/logs enabled", "📝".cyan());
    }

    Ok(AppConfig {
        generator: build_generator(&chat),
        chat,
    })
}

pub fn build_generator(chat: &ChatConfig) -> ResponseGenerator {
    ResponseGenerator::new(Arc::new(chat.client.clone()), chat.topic.clone())
        .with_persona(chat.persona.clone())
        .with_timeout(chat.client.timeout)
}
