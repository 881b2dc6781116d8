pub mod app;
pub mod cli;
pub mod config;
pub mod output;

pub use cli::Cli;
pub use config::{AppConfig, ConfigError};
