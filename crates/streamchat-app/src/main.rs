use anyhow::Result;
use clap::Parser;

use streamchat::app::{run_repl_mode, setup_from_cli, show_model_info};
use streamchat::Cli;
use streamchat_api::ChatClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = setup_from_cli(&cli)?;
    let client = ChatClient::new(config.client_config(cli.verbose));

    if cli.model_info {
        return show_model_info(&client).await;
    }

    run_repl_mode(&cli, config, client).await
}
