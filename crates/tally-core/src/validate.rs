//! Validation at the record boundary
//!
//! Nothing reaches storage without passing through here. The rule parser may
//! produce a zero amount; such a record is valid to show but not to save.

use serde_json::Value;

use crate::ai::parsing::coerce_amount;
use crate::error::{Error, Result};
use crate::models::{Category, ParsedTransaction, TransactionType};

const REQUIRED_FIELDS: &[&str] = &["type", "item", "category", "amount"];

/// Validate an untyped transaction (e.g. from a client or a file) and convert it
pub fn validate_transaction(value: &Value) -> Result<ParsedTransaction> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Validation("expected a JSON object".into()))?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| obj.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let tx_type: TransactionType = obj["type"]
        .as_str()
        .ok_or_else(|| Error::Validation("type must be a string".into()))?
        .parse()
        .map_err(Error::Validation)?;

    let item = obj["item"]
        .as_str()
        .ok_or_else(|| Error::Validation("item must be a string".into()))?
        .trim()
        .to_string();

    let category: Category = obj["category"]
        .as_str()
        .ok_or_else(|| Error::Validation("category must be a string".into()))?
        .parse()
        .map_err(Error::Validation)?;

    let amount = coerce_amount(&obj["amount"]).ok_or_else(|| {
        Error::Validation(format!("amount is not a valid number: {}", obj["amount"]))
    })?;

    let parsed = ParsedTransaction {
        tx_type,
        item,
        category,
        amount,
    };
    parsed.validate()?;
    Ok(parsed)
}

impl ParsedTransaction {
    /// Check that this record may be stored
    pub fn validate(&self) -> Result<()> {
        if self.item.trim().is_empty() {
            return Err(Error::Validation("item must not be empty".into()));
        }
        if !self.amount.is_finite() {
            return Err(Error::Validation(format!(
                "amount must be a finite number, got {}",
                self.amount
            )));
        }
        if self.amount <= 0.0 {
            return Err(Error::Validation(format!(
                "amount must be greater than 0, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}
