//! Export command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::export::{snapshot_json, transactions_csv, ExportFormat};
use tally_core::Ledger;

pub fn cmd_export(
    ledger: &Ledger,
    format: &str,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    let snapshot = ledger.snapshot(today)?;

    let content = match format {
        ExportFormat::Json => snapshot_json(&snapshot)?,
        ExportFormat::Csv => transactions_csv(&snapshot.transactions)?,
    };

    match output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✅ Exported {} transactions to {}",
                snapshot.transactions.len(),
                path.display()
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}
