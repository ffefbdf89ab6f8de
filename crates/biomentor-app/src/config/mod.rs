use anyhow::{bail, Context, Result};
use biomentor_chat::DEFAULT_PERSONA;
use biomentor_llm_api::{
    parse_model_spec, BackendType, ClientSettings, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
use biomentor_logging::RequestLogging;
use biomentor_policy::{TopicConfig, TopicPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cli::Cli;

/// Accepted sampling temperature range
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// `[chat]` table of the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatFileConfig {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// Contents of a biomentor TOML config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub chat: ChatFileConfig,
    #[serde(default)]
    pub topic: TopicConfig,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub client: ClientSettings,
    pub persona: String,
    pub topic: TopicPolicy,
    /// Credential handed to new sessions
    pub default_api_key: Option<String>,
}

impl ChatConfig {
    /// Merge CLI/env values over the config file over built-in defaults.
    ///
    /// clap already folds environment variables into `cli`, so a `Some` there
    /// beats anything in `file`.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let model_spec = cli
            .model
            .clone()
            .or(file.chat.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let (model, spec_backend, spec_url) = parse_model_spec(&model_spec);
        if model.trim().is_empty() {
            bail!("Model name must not be empty");
        }

        let explicit_backend = match cli.backend.as_deref().or(file.chat.backend.as_deref()) {
            Some(name) => {
                Some(BackendType::from_str(name).with_context(|| format!("Unknown backend '{}'", name))?)
            }
            None => None,
        };

        let api_url = cli.api_url.clone().or(spec_url).or(file.chat.api_url);

        let backend = explicit_backend
            .or(spec_backend)
            .or_else(|| api_url.as_deref().map(BackendType::detect_from_url))
            .unwrap_or(BackendType::Gemini);

        let temperature = cli
            .temperature
            .or(file.chat.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !TEMPERATURE_RANGE.contains(&temperature) {
            bail!(
                "Temperature {} is out of range ({} to {})",
                temperature,
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            );
        }

        let timeout = match cli.timeout_secs.or(file.chat.timeout_secs) {
            Some(0) => bail!("Timeout must be at least one second"),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let topic = if cli.no_topic_gate {
            TopicPolicy::disabled()
        } else {
            TopicPolicy::from_config(&file.topic)
        };

        let default_api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from);

        Ok(Self {
            client: ClientSettings {
                backend,
                model,
                api_url,
                temperature,
                timeout,
                logging: RequestLogging {
                    verbose: cli.verbose,
                    to_file: cli.log_requests,
                },
            },
            persona: file.chat.persona.unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            topic,
            default_api_key,
        })
    }
}
