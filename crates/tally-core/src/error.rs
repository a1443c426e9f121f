//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A transaction was rejected at the record boundary
    #[error("Invalid transaction: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The remote classifier could not produce a usable result
    #[error("Remote classifier error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, Error>;
