//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tally_core::{Config, Ledger, StorageBackend, StorageConfig, TransactionType};

use crate::commands::{self, truncate};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn config_for(dir: &Path, backend: StorageBackend) -> Config {
    let file = match backend {
        StorageBackend::Sqlite => "tally.db",
        StorageBackend::Json => "tally.json",
    };
    Config {
        storage: StorageConfig {
            backend,
            path: dir.join(file),
        },
        ..Default::default()
    }
}

fn setup_ledger(dir: &Path) -> Ledger {
    commands::open_ledger(&config_for(dir, StorageBackend::Sqlite), true).unwrap()
}

// ========== Config Tests ==========

#[test]
fn test_cli_overrides() {
    let mut config = Config::default();
    commands::apply_cli_overrides(&mut config, Some(Path::new("/tmp/x.db")), None).unwrap();
    assert_eq!(config.storage.path, PathBuf::from("/tmp/x.db"));
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);

    let mut config = Config::default();
    commands::apply_cli_overrides(&mut config, None, Some("json")).unwrap();
    assert_eq!(config.storage.backend, StorageBackend::Json);
    assert_eq!(config.storage.path, PathBuf::from("tally.json"));

    let mut config = Config::default();
    commands::apply_cli_overrides(&mut config, Some(Path::new("books.json")), Some("json"))
        .unwrap();
    assert_eq!(config.storage.path, PathBuf::from("books.json"));

    let mut config = Config::default();
    assert!(commands::apply_cli_overrides(&mut config, None, Some("postgres")).is_err());
}

#[test]
fn test_load_config_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[storage]\nbackend = \"json\"\npath = \"ledger.json\"\n",
    )
    .unwrap();

    let config = commands::load_config(Some(&path), None, None).unwrap();
    assert_eq!(config.storage.backend, StorageBackend::Json);

    let missing = dir.path().join("missing.toml");
    assert!(commands::load_config(Some(&missing), None, None).is_err());
}

// ========== Init Tests ==========

#[test]
fn test_cmd_init_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), StorageBackend::Sqlite);
    commands::cmd_init(&config).unwrap();
    assert!(config.storage.path.exists());
}

#[test]
fn test_cmd_init_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), StorageBackend::Json);
    commands::cmd_init(&config).unwrap();
    let content = std::fs::read_to_string(&config.storage.path).unwrap();
    assert!(content.contains("\"transactions\""));
}

// ========== Transaction Command Tests ==========

#[tokio::test]
async fn test_cmd_parse_does_not_save() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    commands::cmd_parse(&ledger, "coffee 5 dollars").await.unwrap();
    commands::cmd_parse(&ledger, "no amount here").await.unwrap();
    assert!(ledger.recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_cmd_add() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());

    commands::cmd_add(&ledger, "salary income 30000 dollars", date("2024-03-01"))
        .await
        .unwrap();

    let recent = ledger.recent(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].tx_type, TransactionType::Income);
    assert_eq!(recent[0].item, "salary income");
    assert_eq!(ledger.user_state().unwrap().points, 10);
}

#[tokio::test]
async fn test_cmd_add_without_amount_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());

    let result = commands::cmd_add(&ledger, "groceries", date("2024-03-01")).await;
    assert!(result.is_err());
    assert!(ledger.recent(10).unwrap().is_empty());
    assert_eq!(ledger.user_state().unwrap().points, 0);
}

#[test]
fn test_cmd_record() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());

    commands::cmd_record(&ledger, "expense", "concert", "entertainment", "80", date("2024-03-01"))
        .unwrap();
    let recent = ledger.recent(1).unwrap();
    assert_eq!(recent[0].amount, 80.0);

    assert!(
        commands::cmd_record(&ledger, "expense", "concert", "music", "80", date("2024-03-01"))
            .is_err()
    );
    assert!(
        commands::cmd_record(&ledger, "expense", "concert", "other", "-3", date("2024-03-01"))
            .is_err()
    );
    assert!(
        commands::cmd_record(&ledger, "gift", "concert", "other", "3", date("2024-03-01"))
            .is_err()
    );
    assert_eq!(ledger.recent(10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_cmd_list() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    commands::cmd_list(&ledger, 20).unwrap();

    commands::cmd_add(&ledger, "午餐 120 元", date("2024-03-01"))
        .await
        .unwrap();
    commands::cmd_list(&ledger, 20).unwrap();
}

// ========== Stats Command Tests ==========

#[test]
fn test_parse_month() {
    assert_eq!(commands::parse_month("2024-03").unwrap(), date("2024-03-01"));
    assert_eq!(commands::parse_month(" 2023-12 ").unwrap(), date("2023-12-01"));
    assert!(commands::parse_month("2024-13").is_err());
    assert!(commands::parse_month("March").is_err());
}

#[tokio::test]
async fn test_cmd_summary() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    commands::cmd_add(&ledger, "rent 12000", date("2024-03-01"))
        .await
        .unwrap();

    commands::cmd_summary(&ledger, None, false, date("2024-03-10")).unwrap();
    commands::cmd_summary(&ledger, Some("2024-03"), true, date("2024-05-10")).unwrap();
    commands::cmd_summary(&ledger, Some("2024-04"), true, date("2024-05-10")).unwrap();
    assert!(commands::cmd_summary(&ledger, Some("bad"), false, date("2024-05-10")).is_err());
}

#[test]
fn test_cmd_check_in_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    commands::cmd_stats(&ledger).unwrap();

    commands::cmd_check_in(&ledger, date("2024-03-01")).unwrap();
    commands::cmd_check_in(&ledger, date("2024-03-01")).unwrap();
    commands::cmd_check_in(&ledger, date("2024-03-02")).unwrap();

    let state = ledger.user_state().unwrap();
    assert_eq!(state.points, 20);
    assert_eq!(state.streak, 2);
    commands::cmd_stats(&ledger).unwrap();
}

// ========== Export Command Tests ==========

#[tokio::test]
async fn test_cmd_export() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = setup_ledger(dir.path());
    commands::cmd_add(&ledger, "coffee 5 dollars", date("2024-03-01"))
        .await
        .unwrap();

    let csv_path = dir.path().join("out.csv");
    commands::cmd_export(&ledger, "csv", Some(&csv_path), date("2024-03-01")).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("date,type,item,category,amount\n"));
    assert!(csv.contains("2024-03-01,expense,coffee,food,5"));

    let json_path = dir.path().join("out.json");
    commands::cmd_export(&ledger, "json", Some(&json_path), date("2024-03-01")).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["user"]["points"], 10);
    assert_eq!(value["summary"]["expense"], 5.0);

    assert!(commands::cmd_export(&ledger, "xml", None, date("2024-03-01")).is_err());
}

// ========== Remote Command Tests ==========

#[tokio::test]
async fn test_cmd_remote() {
    let mut config = Config::default();
    commands::cmd_remote(&config, false).await.unwrap();
    commands::cmd_remote(&config, true).await.unwrap();

    config.remote.backend = tally_core::RemoteBackend::Mock;
    commands::cmd_remote(&config, false).await.unwrap();
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("coffee", 10), "coffee");
    assert_eq!(truncate("a very long item name", 10), "a very ...");
    // Multi-byte characters are counted, not bytes
    assert_eq!(truncate("薪水收入薪水收入", 6), "薪水收...");
}
