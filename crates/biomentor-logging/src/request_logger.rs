use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{get_logs_dir, mask_secret, safe_truncate};

const MAX_CONSOLE_BODY_CHARS: usize = 5000;

/// Request logging switches carried by every API client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestLogging {
    /// Print request/response blocks to the console
    pub verbose: bool,
    /// Write request/response files under ~/.biomentor/logs
    pub to_file: bool,
}

impl RequestLogging {
    pub fn is_enabled(&self) -> bool {
        self.verbose || self.to_file
    }
}

fn describe_url(url: &str) -> Vec<(&'static str, String)> {
    let mut lines = vec![("URL", url.to_string())];
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        lines.push(("Host", parsed_url.host_str().unwrap_or("unknown").to_string()));
        lines.push((
            "Port",
            parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" {
                    "443 (default)".to_string()
                } else {
                    "80 (default)".to_string()
                }
            }),
        ));
        lines.push(("Scheme", parsed_url.scheme().to_string()));
    }
    lines
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}

fn print_truncated(text: &str) {
    if text.chars().count() > MAX_CONSOLE_BODY_CHARS {
        println!("{}", safe_truncate(text, MAX_CONSOLE_BODY_CHARS));
        println!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        println!("{}", text);
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request<T: Serialize>(url: &str, request: &T, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    for (label, value) in describe_url(url) {
        println!("{}: {}", label.bright_yellow(), value);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Credential: {}", mask_secret(api_key));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_truncated(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    print_truncated(&pretty_body(body));

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log HTTP request to ~/.biomentor/logs. Returns the timestamp used in the file name.
pub fn log_request_to_file<T: Serialize>(url: &str, request: &T, model: &str, api_key: &str) -> Result<i64> {
    let logs_dir = get_logs_dir()?;
    let timestamp = chrono::Utc::now().timestamp_millis();
    let path = log_request_to_dir(&logs_dir, timestamp, url, request, model, api_key)?;
    println!("{}", format!("📝 Request logged to: {}", path.display()).bright_blue());
    Ok(timestamp)
}

/// Write a request log into `logs_dir`
pub fn log_request_to_dir<T: Serialize>(
    logs_dir: &Path,
    timestamp: i64,
    url: &str,
    request: &T,
    model: &str,
    api_key: &str,
) -> Result<PathBuf> {
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("req-{}-{}.txt", timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));

    for (label, value) in describe_url(url) {
        log_content.push_str(&format!("{}: {}\n", label, value));
    }

    log_content.push_str("\nHeaders:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Credential: {}\n\n", mask_secret(api_key)));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    Ok(file_path)
}

/// Log HTTP response to ~/.biomentor/logs, paired with the request by timestamp
pub fn log_response_to_file(
    status: reqwest::StatusCode,
    body: &str,
    request_timestamp: i64,
    model: &str,
) -> Result<()> {
    let logs_dir = get_logs_dir()?;
    let path = log_response_to_dir(&logs_dir, status, body, request_timestamp, model)?;
    println!("{}", format!("📄 Response logged to: {}", path.display()).bright_blue());
    Ok(())
}

/// Write a response log into `logs_dir`
pub fn log_response_to_dir(
    logs_dir: &Path,
    status: reqwest::StatusCode,
    body: &str,
    request_timestamp: i64,
    model: &str,
) -> Result<PathBuf> {
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("resp-{}-{}.txt", request_timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", request_timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));
    log_content.push_str(&format!(
        "Status: {} {}\n\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ));

    log_content.push_str("Response Body:\n");
    log_content.push_str(&pretty_body(body));
    log_content.push('\n');

    log_content.push_str("\n---\n");
    log_content.push_str(&format!("Response Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_log_masks_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_request_to_dir(
            dir.path(),
            42,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent",
            &json!({ "contents": [] }),
            "gemini-pro",
            "AIzaSySecretValue",
        )
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "req-42-gemini-pro.txt");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Host: generativelanguage.googleapis.com"));
        assert!(content.contains("Credential: AIzaSy***"));
        assert!(!content.contains("SecretValue"));
    }

    #[test]
    fn test_response_log_pretty_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_response_to_dir(
            dir.path(),
            reqwest::StatusCode::OK,
            r#"{"candidates":[]}"#,
            42,
            "models/gemini-pro",
        )
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "resp-42-models-gemini-pro.txt");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Status: 200 OK"));
        assert!(content.contains("\"candidates\": []"));
    }

    #[test]
    fn test_response_log_keeps_non_json_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_response_to_dir(
            dir.path(),
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream unavailable",
            7,
            "gpt-4o-mini",
        )
        .unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Status: 502 Bad Gateway"));
        assert!(content.contains("upstream unavailable"));
    }
}
