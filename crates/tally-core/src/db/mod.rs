//! SQLite storage with connection pooling and migrations
//!
//! This module is organized by table:
//! - `transactions` - Transaction inserts and listing
//! - `user_state` - The single-row gamification state

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::TransactionBehavior;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Transaction, UserState};
use crate::storage::StorageGateway;

mod transactions;
mod user_state;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            // Writers queue behind BEGIN IMMEDIATE instead of failing fast
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        });
        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the single writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Transactions, newest first by (date, id)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
                item TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

            -- Gamification state (exactly one row)
            CREATE TABLE IF NOT EXISTS user_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                points INTEGER NOT NULL DEFAULT 0,
                streak INTEGER NOT NULL DEFAULT 0,
                last_record_date DATE
            );

            INSERT OR IGNORE INTO user_state (id) VALUES (1);
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}

impl StorageGateway for Database {
    fn append(&self, tx: &Transaction) -> Result<()> {
        self.insert_transaction(tx)?;
        Ok(())
    }

    fn read_all(&self) -> Result<(Vec<Transaction>, UserState)> {
        let conn = self.conn()?;
        let txs = transactions::list(&conn, None)?;
        let state = user_state::get(&conn)?;
        Ok((txs, state))
    }

    fn write_user_state(&self, state: &UserState) -> Result<()> {
        let conn = self.conn()?;
        user_state::set(&conn, state)
    }

    fn record(
        &self,
        tx: &Transaction,
        update: &dyn Fn(&UserState) -> UserState,
    ) -> Result<UserState> {
        let mut conn = self.conn()?;
        let db_tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = transactions::insert(&db_tx, tx)?;
        let current = user_state::get(&db_tx)?;
        let next = update(&current);
        user_state::set(&db_tx, &next)?;

        db_tx.commit()?;
        debug!(id, points = next.points, streak = next.streak, "Recorded transaction");
        Ok(next)
    }

    fn recent(&self, limit: usize) -> Result<Vec<Transaction>> {
        self.list_transactions(Some(limit))
    }

    fn location(&self) -> String {
        format!("sqlite:{}", self.db_path)
    }
}
