use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for biomentor
#[derive(Parser, Debug, Clone)]
#[command(name = "biomentor")]
#[command(about = "Biology Mentor - a chat tutor that answers biology questions")]
#[command(version)]
pub struct Cli {
    /// Run the terminal chat instead of the web widget
    #[arg(short, long, action = clap::ArgAction::SetTrue, conflicts_with = "web")]
    pub interactive: bool,

    /// Serve the web widget (default)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub web: bool,

    /// Chat backend (gemini, openai, groq, llama)
    #[arg(long, value_name = "BACKEND", env = "BIOMENTOR_BACKEND")]
    pub backend: Option<String>,

    /// Model name, optionally as "model@backend(api_url)"
    #[arg(long, value_name = "MODEL", env = "BIOMENTOR_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 2.0
    #[arg(long, value_name = "TEMP", env = "BIOMENTOR_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Override the backend API URL
    #[arg(long, value_name = "URL", env = "BIOMENTOR_API_URL")]
    pub api_url: Option<String>,

    /// Upper bound on one model call, in seconds
    #[arg(long, value_name = "SECS", env = "BIOMENTOR_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Credential given to new sessions. Sessions can still enter their own.
    #[arg(long, value_name = "KEY", env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH", env = "BIOMENTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Web server port
    #[arg(long, default_value = "8080", env = "BIOMENTOR_PORT")]
    pub port: u16,

    /// Web server bind address
    #[arg(long, default_value = "127.0.0.1", env = "BIOMENTOR_BIND")]
    pub bind: String,

    /// Forward every question to the model, biology or not
    #[arg(long)]
    pub no_topic_gate: bool,

    /// Enable verbose debug output (shows HTTP requests and responses)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Write every request and response to ~/.biomentor/logs
    #[arg(long)]
    pub log_requests: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Web,
    Interactive,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        if self.interactive {
            RunMode::Interactive
        } else {
            RunMode::Web
        }
    }
}
