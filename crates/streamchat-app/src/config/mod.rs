pub mod prompt;

use std::env;
use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use streamchat_api::{ClientConfig, OPENAI_BASE_URL};

pub use prompt::{format_current_datetime, read_system_prompt, DEFAULT_SYSTEM_PROMPT};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("failed to read system prompt file {path}: {source}")]
    SystemPrompt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings resolved from CLI flags, the environment and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub system_prompt: String,
}

impl AppConfig {
    /// Resolve the configuration. CLI values win over the environment, which
    /// wins over defaults.
    pub fn load(
        cli_model: Option<&str>,
        cli_temperature: Option<f64>,
        system_prompt: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = non_empty_env("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let base_url = non_empty_env("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        let model = cli_model
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .or_else(|| non_empty_env("OPENAI_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let temperature =
            resolve_temperature(cli_temperature, non_empty_env("OPENAI_TEMPERATURE").as_deref());
        let system_prompt = system_prompt
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            system_prompt,
        })
    }

    pub fn client_config(&self, verbose: bool) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            verbose,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn warn_temperature(message: String) {
    eprintln!("{} {}", "Warning:".yellow(), message);
}

fn in_range(temperature: f64) -> bool {
    (0.0..=2.0).contains(&temperature)
}

/// Pick the sampling temperature.
///
/// An explicit CLI value is used when it lies in 0.0-2.0; otherwise the
/// default applies without consulting the environment. Without a CLI value
/// `OPENAI_TEMPERATURE` is parsed and range-checked the same way.
pub fn resolve_temperature(cli: Option<f64>, env_value: Option<&str>) -> f64 {
    if let Some(temperature) = cli {
        if in_range(temperature) {
            return temperature;
        }
        warn_temperature(format!(
            "Temperature value {} is outside valid range (0.0-2.0), using default {}",
            temperature, DEFAULT_TEMPERATURE
        ));
        return DEFAULT_TEMPERATURE;
    }

    let Some(raw) = env_value else {
        return DEFAULT_TEMPERATURE;
    };
    match raw.trim().parse::<f64>() {
        Ok(temperature) if in_range(temperature) => temperature,
        Ok(temperature) => {
            warn_temperature(format!(
                "Temperature value {} is outside valid range (0.0-2.0), using default {}",
                temperature, DEFAULT_TEMPERATURE
            ));
            DEFAULT_TEMPERATURE
        }
        Err(_) => {
            warn_temperature(format!(
                "Invalid temperature value '{}', using default {}",
                raw, DEFAULT_TEMPERATURE
            ));
            DEFAULT_TEMPERATURE
        }
    }
}
