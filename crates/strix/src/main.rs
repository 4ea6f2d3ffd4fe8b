//! Strix - agentic chat assistant with multi-tool orchestration.
//!
//! Main entry point for the Strix CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ask, chat, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Strix - agentic chat assistant with multi-tool orchestration
#[derive(Parser)]
#[command(name = "strix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output events as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Model identifier for the completion backend
    #[arg(long, global = true, env = "STRIX_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask(ask::AskArgs),

    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),

    /// List the registered tools
    Tools(tools::ToolsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "strix=debug,strix_agent=debug,strix_llm=debug,strix_search=debug,strix_session=debug,info"
    } else {
        "strix=info,strix_agent=info,strix_llm=info,strix_search=info,strix_session=info,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context {
        model: cli.model,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Ask(args) => ask::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Tools(args) => tools::run(args, &ctx).await,
    }
}
