use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use streamchat_models::ChatRequest;
use crate::{get_logs_dir, mask_api_key, safe_truncate};

const MAX_CONSOLE_CHARS: usize = 5000;
const MAX_CHUNK_CHARS: usize = 200;

fn describe_url(url: &str) -> Vec<(&'static str, String)> {
    match reqwest::Url::parse(url) {
        Ok(parsed_url) => vec![
            ("URL", url.to_string()),
            ("Host", parsed_url.host_str().unwrap_or("unknown").to_string()),
            ("Port", parsed_url.port().map(|p| p.to_string()).unwrap_or_else(||
                if parsed_url.scheme() == "https" { "443 (default)".to_string() } else { "80 (default)".to_string() }
            )),
            ("Scheme", parsed_url.scheme().to_string()),
        ],
        Err(_) => vec![("URL", url.to_string())],
    }
}

fn print_truncated(text: &str) {
    if text.chars().count() > MAX_CONSOLE_CHARS {
        println!("{}", safe_truncate(text, MAX_CONSOLE_CHARS));
        println!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        println!("{}", text);
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &ChatRequest, api_key: &str, verbose: bool) {
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
    println!("  Accept: text/event-stream");
    println!("  Authorization: Bearer {}", mask_api_key(api_key));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_truncated(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Render the request log written by [`write_request_log`]
fn render_request_log(url: &str, request: &ChatRequest, api_key: &str, timestamp: &str) -> String {
    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", request.model));

    for (label, value) in describe_url(url) {
        log_content.push_str(&format!("{}: {}\n", label, value));
    }
    log_content.push('\n');

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", mask_api_key(api_key)));

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

    log_content
}

/// Write a request log into `logs_dir` and return the file path
pub fn write_request_log(logs_dir: &Path, url: &str, request: &ChatRequest, api_key: &str) -> Result<PathBuf> {
    let now = chrono::Utc::now();
    let model_name = request.model.replace(['/', ':'], "-");
    let filename = format!("req-{}-{}.txt", now.format("%Y%m%d-%H%M%S%.3f"), model_name);
    let file_path = logs_dir.join(filename);

    let log_content = render_request_log(url, request, api_key, &now.to_rfc3339());
    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    Ok(file_path)
}

/// Log HTTP request to ~/.streamchat/logs for persistent debugging
pub fn log_request_to_file(url: &str, request: &ChatRequest, api_key: &str) -> Result<PathBuf> {
    let logs_dir = get_logs_dir()?;
    let file_path = write_request_log(&logs_dir, url, request, api_key)?;
    println!("{}", format!("📝 Request logged to: {}", file_path.display()).bright_blue());
    Ok(file_path)
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, headers: &reqwest::header::HeaderMap, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!("{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            println!("  {}: {}", name.as_str().bright_white(), val_str);
        }
    }

    println!("\n{}", "Response Body:".bright_yellow());
    // Try to pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json_val| serde_json::to_string_pretty(&json_val).ok());
    print_truncated(pretty.as_deref().unwrap_or(body));

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log streaming chunk for debugging (console output)
pub fn log_stream_chunk(chunk_num: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", format!("📦 Stream Chunk #{}: {}", chunk_num,
        if data.chars().count() > MAX_CHUNK_CHARS {
            format!("{}... ({} bytes)", safe_truncate(data, MAX_CHUNK_CHARS), data.len())
        } else {
            data.to_string()
        }
    ).bright_black());
}
