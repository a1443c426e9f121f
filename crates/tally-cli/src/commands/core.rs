//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve config file, environment and CLI flags
//! - `open_ledger` - Shared utility to open the configured ledger
//! - `cmd_init` - Create the store

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::{open_store, Config, Ledger, StorageBackend, StorageGateway};
use tracing::debug;

/// Load config, then apply `--db` and `--store` on top
pub fn load_config(
    config_path: Option<&Path>,
    db: Option<&Path>,
    store: Option<&str>,
) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load config")?;
    apply_cli_overrides(&mut config, db, store)?;
    debug!(
        store = config.storage.backend.as_str(),
        path = %config.storage.path.display(),
        remote = %config.remote.backend,
        "Resolved configuration"
    );
    Ok(config)
}

/// Apply `--db` and `--store` to a loaded config
pub fn apply_cli_overrides(config: &mut Config, db: Option<&Path>, store: Option<&str>) -> Result<()> {
    if let Some(store) = store {
        let backend: StorageBackend = store.parse().map_err(anyhow::Error::msg)?;
        // `--store json` without a path should not write JSON into tally.db
        if backend == StorageBackend::Json
            && db.is_none()
            && config.storage.path == Path::new("tally.db")
        {
            config.storage.path = PathBuf::from("tally.json");
        }
        config.storage.backend = backend;
    }
    if let Some(db) = db {
        config.storage.path = db.to_path_buf();
    }
    Ok(())
}

/// Open the configured store and parser
pub fn open_ledger(config: &Config, offline: bool) -> Result<Ledger> {
    Ledger::from_config(config, offline).with_context(|| {
        format!(
            "Failed to open {} store at {}",
            config.storage.backend.as_str(),
            config.storage.path.display()
        )
    })
}

pub fn cmd_init(config: &Config) -> Result<()> {
    println!(
        "🔧 Initializing {} store at {}...",
        config.storage.backend.as_str(),
        config.storage.path.display()
    );

    let store = open_store(&config.storage).context("Failed to create store")?;
    let (transactions, user) = store.read_all()?;
    println!("   Transactions: {}", transactions.len());
    println!("   Points: {} │ Streak: {}", user.points, user.streak);

    println!("✅ Store initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record something: tally add coffee 5 dollars");
    println!("  2. See the month:    tally summary");

    Ok(())
}
