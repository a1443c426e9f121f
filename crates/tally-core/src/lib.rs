//! Tally Core Library
//!
//! Shared functionality for the Tally voice-driven expense tracker:
//! - Rule-based utterance parsing with keyword category tables
//! - Pluggable remote classifiers (OpenAI, Groq, Ollama) with rule fallback
//! - Daily streaks and points
//! - Monthly summaries
//! - SQLite and JSON file storage gateways
//! - Prompt file for remote classification

pub mod ai;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod gamification;
pub mod ledger;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod storage;
pub mod summary;
pub mod validate;

/// Test utilities including mock remote classifier server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIClient, MockBackend, OllamaBackend, OpenAICompatibleBackend, RemoteClassifier,
};
pub use config::{Config, RemoteBackend, RemoteConfig, StorageBackend, StorageConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use ledger::Ledger;
pub use models::{
    Category, CategoryTotal, LedgerSnapshot, MonthlySummary, ParsedTransaction, Transaction,
    TransactionType, UserState,
};
pub use parser::{RuleParser, TextParser};
pub use prompts::Prompt;
pub use storage::{open_store, JsonFileStore, StorageGateway};
pub use validate::validate_transaction;
