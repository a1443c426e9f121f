//! Summary, stats and check-in commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::Ledger;

/// Parse a `YYYY-MM` month into its first day
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}' (expected YYYY-MM)", month))
}

pub fn cmd_summary(
    ledger: &Ledger,
    month: Option<&str>,
    by_category: bool,
    today: NaiveDate,
) -> Result<()> {
    let reference = match month {
        Some(m) => parse_month(m)?,
        None => today,
    };
    let summary = ledger.get_summary(reference)?;

    println!();
    println!("📊 Summary for {}", reference.format("%Y-%m"));
    println!("   ─────────────────────────────────");
    println!("   Income:   \x1b[32m${:>12.2}\x1b[0m", summary.income);
    println!("   Expense:  \x1b[31m${:>12.2}\x1b[0m", summary.expense);
    if summary.savings < 0.0 {
        println!("   Savings:  \x1b[31m${:>12.2}\x1b[0m", summary.savings);
    } else {
        println!("   Savings:  ${:>12.2}", summary.savings);
    }

    if by_category {
        let totals = ledger.summary_by_category(reference)?;
        println!();
        if totals.is_empty() {
            println!("   No expenses this month.");
        } else {
            println!("   By category:");
            for total in totals {
                println!(
                    "   {:<14} ${:>12.2}  ({} item{})",
                    total.category,
                    total.total,
                    total.count,
                    if total.count == 1 { "" } else { "s" }
                );
            }
        }
    }

    Ok(())
}

pub fn cmd_stats(ledger: &Ledger) -> Result<()> {
    let state = ledger.user_state()?;

    println!();
    println!("🏆 Stats");
    println!("   ⭐ Points: {}", state.points);
    println!("   🔥 Streak: {}", state.streak);
    match state.last_record_date {
        Some(date) => println!("   📅 Last record: {}", date),
        None => println!("   📅 No records yet"),
    }

    Ok(())
}

pub fn cmd_check_in(ledger: &Ledger, today: NaiveDate) -> Result<()> {
    let before = ledger.user_state()?;
    let after = ledger.check_in(today)?;

    if after == before {
        println!("👍 Already counted today. Streak: {}", after.streak);
    } else {
        println!(
            "✅ Checked in! ⭐ Points: {} │ 🔥 Streak: {}",
            after.points, after.streak
        );
    }
    Ok(())
}
