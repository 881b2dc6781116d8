use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::{read_system_prompt, AppConfig, ConfigError};

/// Resolve the application configuration from CLI flags and the environment
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let system_prompt = cli
        .system_prompt
        .as_deref()
        .map(read_system_prompt)
        .transpose()?;

    match AppConfig::load(cli.model.as_deref(), cli.temperature, system_prompt) {
        Ok(config) => {
            if cli.verbose {
                println!(
                    "{}",
                    format!(
                        "Model: {} • Endpoint: {} • Temperature: {}",
                        config.model, config.base_url, config.temperature
                    )
                    .bright_black()
                );
            }
            Ok(config)
        }
        Err(e @ ConfigError::MissingApiKey) => {
            eprintln!("{} {}", "Warning:".yellow(), e);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
