//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{validate_transaction, Ledger, Transaction, UserState};

use super::{format_amount, truncate};

pub async fn cmd_parse(ledger: &Ledger, text: &str) -> Result<()> {
    let parsed = ledger.parse_utterance(text).await;
    println!("{}", serde_json::to_string_pretty(&parsed)?);

    if let Err(e) = parsed.validate() {
        println!("⚠️  This would not be saved: {}", e);
    }
    Ok(())
}

pub async fn cmd_add(ledger: &Ledger, text: &str, today: NaiveDate) -> Result<()> {
    let parsed = ledger.parse_utterance(text).await;
    let (tx, state) = ledger
        .record_transaction(parsed, today)
        .with_context(|| format!("Could not record \"{}\"", text))?;

    print_recorded(&tx, &state);
    Ok(())
}

/// Record a transaction from explicit fields, through the same validation
pub fn cmd_record(
    ledger: &Ledger,
    tx_type: &str,
    item: &str,
    category: &str,
    amount: &str,
    today: NaiveDate,
) -> Result<()> {
    let value = serde_json::json!({
        "type": tx_type,
        "item": item,
        "category": category,
        "amount": amount,
    });
    let parsed = validate_transaction(&value).context("Invalid transaction")?;
    let (tx, state) = ledger.record_transaction(parsed, today)?;

    print_recorded(&tx, &state);
    Ok(())
}

pub fn cmd_list(ledger: &Ledger, limit: usize) -> Result<()> {
    let transactions = ledger.recent(limit)?;

    if transactions.is_empty() {
        println!("No transactions yet. Record one with:");
        println!("  tally add coffee 5 dollars");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        println!(
            "   {} │ {:>12} │ {:<13} │ {}",
            tx.date,
            format_amount(tx.tx_type, tx.amount),
            tx.category,
            truncate(&tx.item, 30)
        );
    }

    Ok(())
}

fn print_recorded(tx: &Transaction, state: &UserState) {
    println!(
        "✅ Recorded {} {} ({})",
        format_amount(tx.tx_type, tx.amount),
        tx.item,
        tx.category
    );
    println!(
        "   ⭐ Points: {} │ 🔥 Streak: {} day{}",
        state.points,
        state.streak,
        if state.streak == 1 { "" } else { "s" }
    );
}
