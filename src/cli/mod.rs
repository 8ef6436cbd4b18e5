// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction with the chatbot.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `serve` — loads the model and serves the web page
//   2. `ask`   — loads the model and answers one question

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{AskArgs, Commands, ServeArgs};
use std::sync::Arc;

use crate::application::chat_use_case::{ChatUseCase, ModelSettings};

#[derive(Parser, Debug)]
#[command(
    name = "menstrual-health-qa",
    version,
    about = "Answer menstrual health questions with a fine-tuned T5 model."
)]
pub struct Cli {
    /// The subcommand to run (serve or ask)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => run_serve(args),
            Commands::Ask(args)   => run_ask(args),
        }
    }
}

/// Handles the `serve` subcommand.
/// The model is loaded before the socket is bound, so a bad
/// model directory fails fast instead of serving errors.
fn run_serve(args: ServeArgs) -> Result<()> {
    let server   = args.server_config();
    let settings = ModelSettings::from(args.model);

    tracing::info!("Loading model from '{}'", settings.model_dir.display());
    let chat = Arc::new(ChatUseCase::load(&settings)?);

    let runtime = tokio::runtime::Runtime::new().context("Cannot start async runtime")?;
    runtime.block_on(crate::web::serve(&server, chat))
}

/// Handles the `ask` subcommand.
fn run_ask(args: AskArgs) -> Result<()> {
    let settings = ModelSettings::from(args.model);
    let chat     = ChatUseCase::load(&settings)?;

    println!("{}", chat.respond(&args.question));
    Ok(())
}
