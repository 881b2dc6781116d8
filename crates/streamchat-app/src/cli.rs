use clap::Parser;
use std::path::PathBuf;

const ENV_HELP: &str = "\
Environment Variables:
  OPENAI_API_KEY      API key for OpenAI-compatible API
  OPENAI_BASE_URL     Base URL for OpenAI-compatible API (default: https://api.openai.com/v1)
  OPENAI_MODEL        Model to use for completions (default: gpt-4o)
  OPENAI_TEMPERATURE  Temperature for completions (0.0-2.0, default: 0.7)";

/// CLI arguments for streamchat
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "streamchat")]
#[command(about = "Streaming chat client for OpenAI-compatible APIs")]
#[command(version)]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Hide thinking/reasoning parts of the response
    #[arg(long)]
    pub hide_thinking: bool,

    /// Model to use for completions
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Temperature for completions (0.0-2.0)
    #[arg(long, value_name = "TEMP", allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Output each response as JSON
    #[arg(long)]
    pub json: bool,

    /// Display detailed model information (Ollama servers) and exit
    #[arg(long)]
    pub model_info: bool,

    /// File containing the system prompt
    #[arg(long, value_name = "FILE")]
    pub system_prompt: Option<PathBuf>,

    /// Show verbose output (request and stream dumps)
    #[arg(short, long)]
    pub verbose: bool,
}
