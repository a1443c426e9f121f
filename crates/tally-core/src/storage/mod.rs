//! Storage gateways
//!
//! Two interchangeable stores sit behind [`StorageGateway`]:
//! - [`Database`](crate::db::Database) - SQLite, the default
//! - [`JsonFileStore`] - a single JSON document on disk
//!
//! Both keep transactions most-recent-first and both make
//! [`record`](StorageGateway::record) atomic with respect to other writers.

mod json;

pub use json::JsonFileStore;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::db::Database;
use crate::error::Result;
use crate::models::{Transaction, UserState};

/// Persistence contract for transactions and the user state
pub trait StorageGateway: Send + Sync {
    /// Store a transaction without touching the user state
    fn append(&self, tx: &Transaction) -> Result<()>;

    /// All transactions (most recent first) and the current user state
    fn read_all(&self) -> Result<(Vec<Transaction>, UserState)>;

    /// Replace the user state
    fn write_user_state(&self, state: &UserState) -> Result<()>;

    /// Append `tx` and replace the user state with `update(current)` as one
    /// atomic step, returning the new state
    fn record(
        &self,
        tx: &Transaction,
        update: &dyn Fn(&UserState) -> UserState,
    ) -> Result<UserState>;

    /// The `limit` most recent transactions
    fn recent(&self, limit: usize) -> Result<Vec<Transaction>> {
        let (mut txs, _) = self.read_all()?;
        txs.truncate(limit);
        Ok(txs)
    }

    /// Human-readable location of the store (for CLI output)
    fn location(&self) -> String;
}

/// Open the configured store
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn StorageGateway>> {
    let store: Box<dyn StorageGateway> = match config.backend {
        StorageBackend::Sqlite => Box::new(Database::new(&config.path.to_string_lossy())?),
        StorageBackend::Json => Box::new(JsonFileStore::open(&config.path)?),
    };
    info!(store = %store.location(), "Opened store");
    Ok(store)
}
