//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_config, open_ledger) and init
//! - `transactions` - Parse, add, record and list
//! - `stats` - Summary, stats and check-in
//! - `export` - JSON/CSV export
//! - `remote` - Remote classifier status

pub mod core;
pub mod export;
pub mod remote;
pub mod stats;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use remote::*;
pub use stats::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with a sign and color for terminal output
pub fn format_amount(tx_type: tally_core::TransactionType, amount: f64) -> String {
    match tx_type {
        tally_core::TransactionType::Expense => format!("\x1b[31m-${:.2}\x1b[0m", amount),
        tally_core::TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", amount),
    }
}
