//! Ledger service
//!
//! Ties the parser, the gamification rules, the summaries and a store
//! together. Everything is injected; nothing here is global.

use chrono::NaiveDate;
use tracing::info;

use crate::ai::AIClient;
use crate::config::Config;
use crate::error::Result;
use crate::gamification;
use crate::models::{
    CategoryTotal, LedgerSnapshot, MonthlySummary, ParsedTransaction, Transaction, UserState,
};
use crate::parser::TextParser;
use crate::storage::{open_store, StorageGateway};
use crate::summary;

/// The personal ledger
pub struct Ledger {
    parser: TextParser,
    store: Box<dyn StorageGateway>,
}

impl Ledger {
    pub fn new(parser: TextParser, store: Box<dyn StorageGateway>) -> Self {
        Self { parser, store }
    }

    /// Build the parser and store described by `config`
    ///
    /// With `offline` set the remote classifier is never constructed.
    pub fn from_config(config: &Config, offline: bool) -> Result<Self> {
        let remote = if offline {
            None
        } else {
            AIClient::from_config(&config.remote)?
        };
        let parser = TextParser::with_remote(remote)?;
        let store = open_store(&config.storage)?;
        Ok(Self::new(parser, store))
    }

    pub fn parser(&self) -> &TextParser {
        &self.parser
    }

    pub fn store(&self) -> &dyn StorageGateway {
        self.store.as_ref()
    }

    /// Parse an utterance (remote first if configured, rules otherwise)
    pub async fn parse_utterance(&self, text: &str) -> ParsedTransaction {
        self.parser.parse_with_remote(text).await
    }

    /// Validate, date and store a transaction, updating streak and points
    pub fn record_transaction(
        &self,
        parsed: ParsedTransaction,
        today: NaiveDate,
    ) -> Result<(Transaction, UserState)> {
        parsed.validate()?;

        let tx = Transaction::from_parsed(parsed, today);
        let state = self
            .store
            .record(&tx, &|current| gamification::update(current, today))?;

        info!(
            item = %tx.item,
            category = %tx.category,
            amount = tx.amount,
            points = state.points,
            streak = state.streak,
            "Saved transaction"
        );
        Ok((tx, state))
    }

    /// Parse an utterance and record it
    pub async fn add(&self, text: &str, today: NaiveDate) -> Result<(Transaction, UserState)> {
        let parsed = self.parse_utterance(text).await;
        self.record_transaction(parsed, today)
    }

    /// Income, expense and savings for the month containing `reference`
    pub fn get_summary(&self, reference: NaiveDate) -> Result<MonthlySummary> {
        let (txs, _) = self.store.read_all()?;
        Ok(summary::summarize(&txs, reference))
    }

    /// Expense totals per category for the month containing `reference`
    pub fn summary_by_category(&self, reference: NaiveDate) -> Result<Vec<CategoryTotal>> {
        let (txs, _) = self.store.read_all()?;
        Ok(summary::summarize_by_category(&txs, reference))
    }

    /// Transactions, user state and this month's summary in one read
    pub fn snapshot(&self, today: NaiveDate) -> Result<LedgerSnapshot> {
        let (transactions, user) = self.store.read_all()?;
        let summary = summary::summarize(&transactions, today);
        Ok(LedgerSnapshot {
            transactions,
            user,
            summary,
        })
    }

    /// Apply today's activity to the user state without recording a transaction
    pub fn check_in(&self, today: NaiveDate) -> Result<UserState> {
        let (_, current) = self.store.read_all()?;
        let next = gamification::update(&current, today);
        if next != current {
            self.store.write_user_state(&next)?;
            info!(points = next.points, streak = next.streak, "Checked in");
        }
        Ok(next)
    }

    /// Current user state
    pub fn user_state(&self) -> Result<UserState> {
        Ok(self.store.read_all()?.1)
    }

    /// The `limit` most recent transactions
    pub fn recent(&self, limit: usize) -> Result<Vec<Transaction>> {
        self.store.recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::Error;
    use crate::models::{Category, TransactionType};

    fn ledger() -> Ledger {
        Ledger::new(
            TextParser::new().unwrap(),
            Box::new(Database::in_memory().unwrap()),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_add_updates_state() {
        let ledger = ledger();
        let (tx, state) = ledger
            .add("coffee 5 dollars", date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(tx.item, "coffee");
        assert_eq!(tx.date, date("2024-03-01"));
        assert_eq!(state.points, 10);
        assert_eq!(state.streak, 1);

        // Second record on the same day earns nothing
        let (_, state) = ledger
            .add("lunch 12 dollars", date("2024-03-01"))
            .await
            .unwrap();
        assert_eq!(state.points, 10);

        let (_, state) = ledger.add("taxi 80", date("2024-03-02")).await.unwrap();
        assert_eq!(state.points, 20);
        assert_eq!(state.streak, 2);

        assert_eq!(ledger.recent(10).unwrap().len(), 3);
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let ledger = ledger();
        let parsed = ledger.parser().parse("groceries");
        assert_eq!(parsed.amount, 0.0);

        let result = ledger.record_transaction(parsed, date("2024-03-01"));
        assert!(matches!(result, Err(Error::Validation(_))));

        // Nothing stored, no points
        let snapshot = ledger.snapshot(date("2024-03-01")).unwrap();
        assert!(snapshot.transactions.is_empty());
        assert_eq!(snapshot.user, UserState::default());
    }

    #[test]
    fn test_summary_and_snapshot() {
        let ledger = ledger();
        let p = ledger.parser();
        ledger
            .record_transaction(p.parse("salary income 30000"), date("2024-03-01"))
            .unwrap();
        ledger
            .record_transaction(p.parse("rent 12000"), date("2024-03-02"))
            .unwrap();
        ledger
            .record_transaction(p.parse("coffee 5"), date("2024-02-28"))
            .unwrap();

        let summary = ledger.get_summary(date("2024-03-15")).unwrap();
        assert_eq!(summary.income, 30000.0);
        assert_eq!(summary.expense, 12000.0);
        assert_eq!(summary.savings, 18000.0);

        let by_category = ledger.summary_by_category(date("2024-02-01")).unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].category, Category::Food);

        let snapshot = ledger.snapshot(date("2024-03-15")).unwrap();
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(snapshot.transactions[0].tx_type, TransactionType::Expense);
        assert_eq!(snapshot.transactions[0].item, "rent");
        assert_eq!(snapshot.summary, summary);
    }

    #[test]
    fn test_check_in() {
        let ledger = ledger();
        let state = ledger.check_in(date("2024-03-01")).unwrap();
        assert_eq!(state.points, 10);
        assert_eq!(state.streak, 1);

        let state = ledger.check_in(date("2024-03-01")).unwrap();
        assert_eq!(state.points, 10);

        let state = ledger.check_in(date("2024-03-02")).unwrap();
        assert_eq!(state.streak, 2);
        assert_eq!(ledger.user_state().unwrap(), state);
        assert!(ledger.recent(5).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_from_config_offline() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.remote.backend = crate::config::RemoteBackend::Mock;
        config.storage.path = dir.path().join("tally.db");

        let ledger = Ledger::from_config(&config, true).unwrap();
        assert!(ledger.parser().remote().is_none());

        let ledger = Ledger::from_config(&config, false).unwrap();
        assert!(ledger.parser().remote().is_some());
        assert!(ledger.store().location().ends_with("tally.db"));
    }
}
