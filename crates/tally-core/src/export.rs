//! Export of the ledger as JSON or CSV

use std::io::Write;

use crate::error::{Error, Result};
use crate::models::{LedgerSnapshot, Transaction};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Full snapshot: transactions, user state and monthly summary
    Json,
    /// Transactions only, one row each
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {} (expected json or csv)", s)),
        }
    }
}

/// Write transactions as CSV with a header row
pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "type", "item", "category", "amount"])?;
    for tx in transactions {
        wtr.write_record([
            tx.date.to_string(),
            tx.tx_type.as_str().to_string(),
            tx.item.clone(),
            tx.category.as_str().to_string(),
            tx.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render transactions as a CSV string
pub fn transactions_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_transactions_csv(transactions, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

/// Render a snapshot as pretty-printed JSON
pub fn snapshot_json(snapshot: &LedgerSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, MonthlySummary, TransactionType, UserState};
    use chrono::NaiveDate;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction {
                id: Some(2),
                tx_type: TransactionType::Expense,
                item: "lunch, with friends".to_string(),
                category: Category::Food,
                amount: 12.5,
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            },
            Transaction {
                id: Some(1),
                tx_type: TransactionType::Income,
                item: "salary".to_string(),
                category: Category::Income,
                amount: 30000.0,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            },
        ]
    }

    #[test]
    fn test_csv_export() {
        let csv = transactions_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,type,item,category,amount");
        // Commas in items are quoted
        assert_eq!(lines[1], "2024-03-02,expense,\"lunch, with friends\",food,12.5");
        assert_eq!(lines[2], "2024-03-01,income,salary,income,30000");
    }

    #[test]
    fn test_csv_export_empty() {
        let csv = transactions_csv(&[]).unwrap();
        assert_eq!(csv, "date,type,item,category,amount\n");
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = LedgerSnapshot {
            transactions: sample(),
            user: UserState::default(),
            summary: MonthlySummary {
                income: 30000.0,
                expense: 12.5,
                savings: 29987.5,
            },
        };
        let json = snapshot_json(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["transactions"][1]["type"], "income");
        assert_eq!(value["summary"]["savings"], 29987.5);
        assert_eq!(value["user"]["streak"], 0);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
