//! LeaveDesk CLI: the main entry point.
//!
//! Commands:
//! - `chat`       Interactive session, or one question with `--message`
//! - `employees`  List employees with seniority and used leave
//! - `doctor`     Check config, data files and the LLM provider
//! - `onboard`    Write a default config file

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(
    name = "leavedesk",
    about = "LeaveDesk: ask about leave rules, balances and approvals",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.leavedesk/config.toml)
    #[arg(short, long, global = true, env = "LEAVEDESK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the HR assistant
    Chat {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Compute seniority as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// List employees with seniority and used leave
    Employees {
        /// Compute seniority as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Diagnose configuration, data and provider health
    Doctor,

    /// Initialize configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Chat { message, as_of } => commands::chat::run(config_path, message, as_of).await?,
        Commands::Employees { as_of } => commands::employees::run(config_path, as_of).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Onboard => commands::onboard::run(config_path).await?,
    }

    Ok(())
}
