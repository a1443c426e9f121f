//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Keep your books by talking to them
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Voice-driven personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Store path (default: tally.db, or TALLY_DB / config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true, value_parser = ["sqlite", "json"])]
    pub store: Option<String>,

    /// Config file (default: ~/.local/share/tally/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Never call the remote classifier; use the keyword rules only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store
    Init,

    /// Parse an utterance and print the result without saving it
    Parse {
        /// The utterance, e.g. "coffee 5 dollars"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Parse an utterance and record it
    Add {
        /// The utterance, e.g. "coffee 5 dollars"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Record a transaction from explicit fields
    Record {
        /// expense or income
        #[arg(long = "type", default_value = "expense")]
        tx_type: String,

        /// Item name
        #[arg(long)]
        item: String,

        /// food, transport, housing, entertainment, income, other
        #[arg(long)]
        category: String,

        /// Amount (must be greater than 0)
        #[arg(long)]
        amount: String,
    },

    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the monthly summary
    Summary {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Break expenses down by category
        #[arg(long)]
        by_category: bool,
    },

    /// Show points and streak
    Stats,

    /// Count today toward the streak without recording anything
    CheckIn,

    /// Export the ledger
    Export {
        /// json (full snapshot) or csv (transactions)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the remote classifier configuration and check connectivity
    Remote,
}
