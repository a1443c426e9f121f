//! JSON parsing helpers for remote classifier responses
//!
//! Models often wrap the JSON payload in extra prose or code fences, so the
//! payload is cut from the first `{` to the last `}` before decoding. Every
//! field is then checked; anything missing or unusable is an error so the
//! caller can fall back to the rule-based parser.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Category, ParsedTransaction, TransactionType};

/// Untyped transaction as returned by a model
#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(rename = "type")]
    tx_type: Option<String>,
    item: Option<String>,
    category: Option<String>,
    amount: Option<Value>,
}

/// Cut the JSON object out of a model response
fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in remote response | Raw: {}",
            truncate(response)
        ))),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Coerce a JSON amount (number or numeric string) to a non-negative f64
pub fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// Parse a transaction from a remote classifier response
pub fn parse_transaction(response: &str) -> Result<ParsedTransaction> {
    let json_str = extract_json(response)?;
    let raw: RawTransaction = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from remote: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let tx_type: TransactionType = raw
        .tx_type
        .ok_or_else(|| Error::InvalidData("Remote response missing type".into()))?
        .parse()
        .map_err(Error::InvalidData)?;

    let item = raw
        .item
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidData("Remote response missing item".into()))?;

    let category: Category = raw
        .category
        .ok_or_else(|| Error::InvalidData("Remote response missing category".into()))?
        .parse()
        .map_err(Error::InvalidData)?;

    let amount = raw
        .amount
        .as_ref()
        .ok_or_else(|| Error::InvalidData("Remote response missing amount".into()))
        .and_then(|v| {
            coerce_amount(v)
                .ok_or_else(|| Error::InvalidData(format!("Remote amount is not a number: {}", v)))
        })?;

    // Income always collapses to the income category, whatever the model said
    let category = match tx_type {
        TransactionType::Income => Category::Income,
        TransactionType::Expense => category,
    };

    Ok(ParsedTransaction {
        tx_type,
        item,
        category,
        amount,
    })
}
