//! Monthly income/expense summaries
//!
//! Summaries are recomputed from the transaction list on every call.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Category, CategoryTotal, MonthlySummary, Transaction, TransactionType};

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Totals for the calendar month containing `reference`
pub fn summarize(transactions: &[Transaction], reference: NaiveDate) -> MonthlySummary {
    let mut summary = MonthlySummary::default();
    for tx in transactions.iter().filter(|tx| same_month(tx.date, reference)) {
        match tx.tx_type {
            TransactionType::Income => summary.income += tx.amount,
            TransactionType::Expense => summary.expense += tx.amount,
        }
    }
    summary.savings = summary.income - summary.expense;
    summary
}

/// Expense totals per category for the month containing `reference`
///
/// Sorted by total, largest first. Categories without spending are omitted.
pub fn summarize_by_category(transactions: &[Transaction], reference: NaiveDate) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, (f64, usize)> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.tx_type == TransactionType::Expense && same_month(tx.date, reference))
    {
        let entry = totals.entry(tx.category).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let mut result: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
        })
        .collect();
    result.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(tx_type: TransactionType, category: Category, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: None,
            tx_type,
            item: "item".to_string(),
            category,
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[], reference()), MonthlySummary::default());
        assert!(summarize_by_category(&[], reference()).is_empty());
    }

    #[test]
    fn test_only_reference_month_counts() {
        let txs = vec![
            tx(TransactionType::Income, Category::Income, 30000.0, "2024-03-01"),
            tx(TransactionType::Expense, Category::Food, 5.0, "2024-03-31"),
            tx(TransactionType::Expense, Category::Food, 100.0, "2024-02-29"),
            tx(TransactionType::Expense, Category::Food, 100.0, "2024-04-01"),
            // Same month, different year
            tx(TransactionType::Income, Category::Income, 999.0, "2023-03-15"),
        ];
        let summary = summarize(&txs, reference());
        assert_eq!(summary.income, 30000.0);
        assert_eq!(summary.expense, 5.0);
        assert_eq!(summary.savings, 29995.0);
    }

    #[test]
    fn test_negative_savings() {
        let txs = vec![
            tx(TransactionType::Income, Category::Income, 100.0, "2024-03-02"),
            tx(TransactionType::Expense, Category::Housing, 12000.0, "2024-03-03"),
        ];
        let summary = summarize(&txs, reference());
        assert_eq!(summary.savings, -11900.0);
    }

    #[test]
    fn test_no_transactions_in_month() {
        let txs = vec![tx(TransactionType::Expense, Category::Food, 5.0, "2024-01-01")];
        assert_eq!(summarize(&txs, reference()), MonthlySummary::default());
    }

    #[test]
    fn test_by_category() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, 5.0, "2024-03-01"),
            tx(TransactionType::Expense, Category::Food, 7.5, "2024-03-02"),
            tx(TransactionType::Expense, Category::Transport, 100.0, "2024-03-02"),
            tx(TransactionType::Expense, Category::Housing, 1.0, "2024-02-02"),
            tx(TransactionType::Income, Category::Income, 500.0, "2024-03-05"),
        ];
        let totals = summarize_by_category(&txs, reference());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, Category::Transport);
        assert_eq!(totals[0].total, 100.0);
        assert_eq!(totals[0].count, 1);
        assert_eq!(totals[1].category, Category::Food);
        assert_eq!(totals[1].total, 12.5);
        assert_eq!(totals[1].count, 2);
    }
}
