use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use streamchat_api::{ChatBackend, ChatClient};
use streamchat_chat::Conversation;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::output::{format_token_usage, format_total_usage, TurnReport};

pub const INPUT_PROMPT: &str = "Enter your message (or '/quit' to exit): ";
pub const QUIT_COMMAND: &str = "/quit";

/// What to do with one line of user input
#[derive(Debug, PartialEq, Eq)]
pub enum UserInput {
    Message(String),
    Skip,
    Quit,
}

impl UserInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            UserInput::Skip
        } else if line == QUIT_COMMAND {
            UserInput::Quit
        } else {
            UserInput::Message(line.to_string())
        }
    }
}

/// Send one message and print the reply to `out`.
///
/// Human mode prints fragments as they arrive followed by the usage lines;
/// JSON mode prints a single object once the stream has ended.
pub async fn run_turn<B, W>(
    conversation: &mut Conversation<B>,
    message: &str,
    json: bool,
    out: &mut W,
) -> Result<()>
where
    B: ChatBackend,
    W: Write,
{
    if !json {
        writeln!(out, "\nResponse:")?;
    }

    let mut write_error: Option<io::Error> = None;
    let turn = conversation
        .send(message, |fragment| {
            if json || write_error.is_some() {
                return;
            }
            if let Err(e) = out.write_all(fragment.as_bytes()).and_then(|_| out.flush()) {
                write_error = Some(e);
            }
        })
        .await?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    if json {
        writeln!(out, "{}", TurnReport::new(&turn).to_json()?)?;
    } else {
        writeln!(out, "\n\n{}", format_token_usage(&turn.stats))?;
    }
    out.flush()?;
    Ok(())
}

/// Run the interactive loop until `/quit` or end of input
pub async fn run_repl_mode(cli: &Cli, config: AppConfig, client: ChatClient) -> Result<()> {
    let pump = client.pump(cli.hide_thinking);
    let mut conversation = Conversation::new(client, pump).with_system_prompt(config.system_prompt);
    let mut rl = DefaultEditor::new()?;
    let prompt = if cli.json { "" } else { INPUT_PROMPT };

    loop {
        if !cli.json {
            println!();
        }
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => {
                eprintln!("{} error reading input: {}", "Error:".bright_red(), e);
                break;
            }
        };

        let message = match UserInput::parse(&line) {
            UserInput::Quit => break,
            UserInput::Skip => continue,
            UserInput::Message(message) => message,
        };
        if let Err(e) = rl.add_history_entry(message.as_str()) {
            debug!("could not record history: {}", e);
        }

        let mut stdout = io::stdout();
        if let Err(e) = run_turn(&mut conversation, &message, cli.json, &mut stdout).await {
            eprintln!("\n{} {:#}", "Error:".bright_red(), e);
        }
    }

    if !cli.json {
        println!("\n{}", format_total_usage(&conversation.total_usage()));
    }
    Ok(())
}
