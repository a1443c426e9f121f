//! Tally CLI - Voice-driven personal expense tracker
//!
//! Usage:
//!   tally init                        Create the store
//!   tally add coffee 5 dollars        Parse and record an utterance
//!   tally summary --month 2024-03     Monthly income/expense/savings
//!   tally stats                       Points and streak

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(
        cli.config.as_deref(),
        cli.db.as_deref(),
        cli.store.as_deref(),
    )?;
    let today = Local::now().date_naive();
    let open_ledger = || commands::open_ledger(&config, cli.offline);

    match cli.command {
        Commands::Init => commands::cmd_init(&config),
        Commands::Parse { text } => commands::cmd_parse(&open_ledger()?, &text.join(" ")).await,
        Commands::Add { text } => {
            commands::cmd_add(&open_ledger()?, &text.join(" "), today).await
        }
        Commands::Record {
            tx_type,
            item,
            category,
            amount,
        } => commands::cmd_record(&open_ledger()?, &tx_type, &item, &category, &amount, today),
        Commands::List { limit } => commands::cmd_list(&open_ledger()?, limit),
        Commands::Summary { month, by_category } => {
            commands::cmd_summary(&open_ledger()?, month.as_deref(), by_category, today)
        }
        Commands::Stats => commands::cmd_stats(&open_ledger()?),
        Commands::CheckIn => commands::cmd_check_in(&open_ledger()?, today),
        Commands::Export { format, output } => {
            commands::cmd_export(&open_ledger()?, &format, output.as_deref(), today)
        }
        Commands::Remote => commands::cmd_remote(&config, cli.offline).await,
    }
}
