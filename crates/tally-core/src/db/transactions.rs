//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::Database;
use crate::error::Result;
use crate::models::Transaction;

const SELECT_COLUMNS: &str = "SELECT id, type, item, category, amount, date FROM transactions";

/// Insert a transaction, returning its row id
pub(super) fn insert(conn: &Connection, tx: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (type, item, category, amount, date) VALUES (?, ?, ?, ?, ?)",
        params![
            tx.tx_type.as_str(),
            tx.item,
            tx.category.as_str(),
            tx.amount,
            tx.date.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// List transactions, most recent first
pub(super) fn list(conn: &Connection, limit: Option<usize>) -> Result<Vec<Transaction>> {
    // SQLite treats a negative LIMIT as unbounded
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY date DESC, id DESC LIMIT ?",
        SELECT_COLUMNS
    ))?;

    let txs = stmt
        .query_map(params![limit], row_to_transaction)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(txs)
}

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(1)?;
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(5)?;
    Ok(Transaction {
        id: row.get(0)?,
        tx_type: type_str.parse().map_err(|e| conversion_error(1, e))?,
        item: row.get(2)?,
        category: category_str.parse().map_err(|e| conversion_error(3, e))?,
        amount: row.get(4)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| conversion_error(5, e.to_string()))?,
    })
}

impl Database {
    /// Insert a transaction without touching the user state
    pub fn insert_transaction(&self, tx: &Transaction) -> Result<i64> {
        let conn = self.conn()?;
        insert(&conn, tx)
    }

    /// List transactions, most recent first
    pub fn list_transactions(&self, limit: Option<usize>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        list(&conn, limit)
    }

    /// Count total transactions
    #[cfg(test)]
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
