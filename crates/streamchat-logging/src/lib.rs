// Logging module - request, response and stream chunk logging
pub mod request_logger;

use std::path::PathBuf;
use anyhow::{Result, Context};

pub use request_logger::{
    log_request,
    log_request_to_file,
    write_request_log,
    log_response,
    log_stream_chunk,
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

/// Mask an API key so only its first few characters are shown
pub fn mask_api_key(api_key: &str) -> String {
    format!("{}***", api_key.chars().take(10).collect::<String>())
}

/// Get or create the base streamchat directory (~/.streamchat)
pub fn get_streamchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let dir = PathBuf::from(home_dir).join(".streamchat");

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .context("Failed to create streamchat directory")?;
    }

    Ok(dir)
}

/// Get or create the logs directory (~/.streamchat/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_streamchat_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir)
            .context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}
