//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of money flow for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending category assigned by the keyword classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Housing,
    Entertainment,
    Income,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Housing => "housing",
            Self::Entertainment => "entertainment",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Housing,
            Self::Entertainment,
            Self::Income,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "housing" => Ok(Self::Housing),
            "entertainment" => Ok(Self::Entertainment),
            "income" => Ok(Self::Income),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as extracted from an utterance, before it is dated and stored
///
/// The amount may be zero here; validation rejects it before it reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub item: String,
    pub category: Category,
    pub amount: f64,
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Row id assigned by the SQLite store (absent in the JSON store)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub item: String,
    pub category: Category,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Transaction {
    /// Stamp a parsed transaction with its storage date
    pub fn from_parsed(parsed: ParsedTransaction, date: NaiveDate) -> Self {
        Self {
            id: None,
            tx_type: parsed.tx_type,
            item: parsed.item,
            category: parsed.category,
            amount: parsed.amount,
            date,
        }
    }
}

/// Gamification state for the single user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub points: u32,
    pub streak: u32,
    pub last_record_date: Option<NaiveDate>,
}

/// Income/expense totals for one calendar month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
}

/// Expense total for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

/// Everything the front end needs in one read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Most recent first
    pub transactions: Vec<Transaction>,
    pub user: UserState,
    pub summary: MonthlySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!(
            "expense".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert_eq!(
            " Income ".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_category_round_trip_names() {
        for cat in Category::all() {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), *cat);
        }
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_parsed_transaction_json_shape() {
        let parsed = ParsedTransaction {
            tx_type: TransactionType::Expense,
            item: "coffee".to_string(),
            category: Category::Food,
            amount: 5.0,
        };
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["category"], "food");
        assert_eq!(value["amount"], 5.0);
    }

    #[test]
    fn test_transaction_date_serializes_as_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let tx = Transaction::from_parsed(
            ParsedTransaction {
                tx_type: TransactionType::Income,
                item: "salary".to_string(),
                category: Category::Income,
                amount: 100.0,
            },
            date,
        );
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["date"], "2024-03-07");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_default_user_state() {
        let state = UserState::default();
        assert_eq!(state.points, 0);
        assert_eq!(state.streak, 0);
        assert!(state.last_record_date.is_none());
    }
}
