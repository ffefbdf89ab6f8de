// Logging module - HTTP request/response debugging
pub mod request_logger;

use std::path::PathBuf;
use anyhow::{Result, Context};

pub use request_logger::{
    RequestLogging,
    log_request,
    log_request_to_file,
    log_request_to_dir,
    log_response,
    log_response_to_file,
    log_response_to_dir,
};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Show only the first few characters of a credential
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(none)".to_string();
    }
    format!("{}***", secret.chars().take(6).collect::<String>())
}

/// Get or create the base directory (~/.biomentor)
pub fn get_biomentor_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let dir = PathBuf::from(home_dir).join(".biomentor");

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .context("Failed to create biomentor directory")?;
    }

    Ok(dir)
}

/// Get or create the logs directory (~/.biomentor/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_biomentor_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir)
            .context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}
