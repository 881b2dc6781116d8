use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};

use super::ConfigError;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const DATETIME_PLACEHOLDER: &str = "{{currentDateTime}}";

/// Format a timestamp as e.g. `Tuesday 1 September 2025, 10:17 AM`
pub fn format_current_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A %-d %B %Y, %-I:%M %p").to_string()
}

/// Read a system prompt file, trim it and fill in `{{currentDateTime}}`
pub fn read_system_prompt(path: &Path) -> Result<String, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::SystemPrompt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(render_system_prompt(&content, &Local::now()))
}

fn render_system_prompt<Tz: TimeZone>(content: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let prompt = content.trim();
    if prompt.contains(DATETIME_PLACEHOLDER) {
        prompt.replace(DATETIME_PLACEHOLDER, &format_current_datetime(now))
    } else {
        prompt.to_string()
    }
}
