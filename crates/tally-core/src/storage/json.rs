//! Single-file JSON store
//!
//! The whole ledger lives in one document:
//!
//! ```json
//! { "transactions": [ ... most recent first ... ], "user": { "points": 0, "streak": 0, "last_record_date": null } }
//! ```
//!
//! Every write goes to a temp file in the same directory and is renamed over
//! the original, so a crash never leaves a half-written document behind.
//!
//! Each access holds an exclusive advisory lock on a sidecar `<path>.lock`
//! file, so separate processes (and separate handles in one process) never
//! interleave a read-modify-write cycle.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Transaction, UserState};

use super::StorageGateway;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    user: UserState,
}

impl Document {
    /// Insert keeping newest-first by date; same-day entries go in front
    fn insert(&mut self, tx: &Transaction) {
        let pos = self
            .transactions
            .iter()
            .position(|existing| existing.date <= tx.date)
            .unwrap_or(self.transactions.len());
        let mut tx = tx.clone();
        tx.id = None;
        self.transactions.insert(pos, tx);
    }
}

/// JSON file backed store
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty document if it is missing
    pub fn open(path: &Path) -> Result<Self> {
        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        let store = Self {
            path: path.to_path_buf(),
            lock_path: PathBuf::from(lock_path),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        store.with_lock(|| {
            if !store.path.exists() {
                store.save(&Document::default())?;
                info!(path = %store.path.display(), "Created JSON store");
            }
            Ok(())
        })?;

        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Document::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!(
                "Corrupt JSON store {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(
            path = %self.path.display(),
            transactions = doc.transactions.len(),
            "Wrote JSON store"
        );
        Ok(())
    }

    /// Run `f` while holding the exclusive lock on the sidecar file
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        FileExt::lock_exclusive(&lock_file).map_err(|e| {
            Error::Storage(format!(
                "Failed to lock {}: {}",
                self.lock_path.display(),
                e
            ))
        })?;

        let result = f();
        // Closing the file also releases the lock
        let _ = FileExt::unlock(&lock_file);
        result
    }
}

impl StorageGateway for JsonFileStore {
    fn append(&self, tx: &Transaction) -> Result<()> {
        self.with_lock(|| {
            let mut doc = self.load()?;
            doc.insert(tx);
            self.save(&doc)
        })
    }

    fn read_all(&self) -> Result<(Vec<Transaction>, UserState)> {
        self.with_lock(|| {
            let doc = self.load()?;
            Ok((doc.transactions, doc.user))
        })
    }

    fn write_user_state(&self, state: &UserState) -> Result<()> {
        self.with_lock(|| {
            let mut doc = self.load()?;
            doc.user = state.clone();
            self.save(&doc)
        })
    }

    fn record(
        &self,
        tx: &Transaction,
        update: &dyn Fn(&UserState) -> UserState,
    ) -> Result<UserState> {
        self.with_lock(|| {
            let mut doc = self.load()?;
            doc.insert(tx);
            doc.user = update(&doc.user);
            self.save(&doc)?;
            Ok(doc.user)
        })
    }

    fn location(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
