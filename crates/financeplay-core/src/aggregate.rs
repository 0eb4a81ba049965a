//! Category aggregation
//!
//! The single place where transactions, income records and savings transfers
//! are folded into totals. Spending is keyed by category (case-sensitive);
//! anything that resolves to income or savings never counts as spending.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{finite_or_zero, Income, SavingsTransfer, Transaction, TransactionKind};

/// Totals derived from one user's money movements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    /// Absolute spend per category
    pub spending_totals: BTreeMap<String, f64>,
    /// Absolute amounts of savings transactions and transfers
    pub savings_total: f64,
    /// Signed amounts of income transactions and income records
    pub income_total: f64,
    /// Sum of `spending_totals`
    pub total: f64,
}

impl CategoryTotals {
    /// Aggregate transactions only
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        aggregate(transactions, &[], &[])
    }

    /// Category with the largest spend; ties go to the alphabetically first
    pub fn top_category(&self) -> Option<(&str, f64)> {
        let mut top: Option<(&str, f64)> = None;
        for (name, &amount) in &self.spending_totals {
            match top {
                Some((_, best)) if amount <= best => {}
                _ => top = Some((name.as_str(), amount)),
            }
        }
        top
    }

    /// Share of total spend for a category, as a whole percent
    pub fn percent_of_total(&self, amount: f64) -> u32 {
        if self.total <= 0.0 {
            return 0;
        }
        (amount / self.total * 100.0).round() as u32
    }
}

/// Fold all three ledgers into totals. Never fails; malformed amounts were
/// already read as 0 and non-finite values are treated the same way here.
pub fn aggregate(
    transactions: &[Transaction],
    incomes: &[Income],
    savings: &[SavingsTransfer],
) -> CategoryTotals {
    let mut spending_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut savings_total = 0.0;
    let mut income_total = 0.0;

    for tx in transactions {
        let amount = finite_or_zero(tx.amount);
        match tx.resolved_kind() {
            TransactionKind::Expense => {
                *spending_totals.entry(tx.category.clone()).or_insert(0.0) += amount.abs();
            }
            TransactionKind::Income => income_total += amount,
            TransactionKind::Savings => savings_total += amount.abs(),
        }
    }

    income_total += incomes.iter().map(|i| finite_or_zero(i.amount)).sum::<f64>();
    savings_total += savings
        .iter()
        .map(|s| finite_or_zero(s.amount).abs())
        .sum::<f64>();

    let total = spending_totals.values().sum();

    CategoryTotals {
        spending_totals,
        savings_total,
        income_total,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(amount: f64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            amount,
            category: category.to_string(),
            kind: None,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            account_id: None,
        }
    }

    #[test]
    fn test_basic_split() {
        let txs = vec![
            tx(-100.0, "food"),
            tx(-20.0, "food"),
            tx(-45.0, "transport"),
            tx(1800.0, "income"),
        ];
        let totals = CategoryTotals::from_transactions(&txs);

        assert_eq!(totals.spending_totals.len(), 2);
        assert_eq!(totals.spending_totals["food"], 120.0);
        assert_eq!(totals.spending_totals["transport"], 45.0);
        assert_eq!(totals.total, 165.0);
        assert_eq!(totals.income_total, 1800.0);
        assert_eq!(totals.savings_total, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let totals = aggregate(&[], &[], &[]);
        assert!(totals.spending_totals.is_empty());
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.income_total, 0.0);
        assert_eq!(totals.savings_total, 0.0);
        assert_eq!(totals.top_category(), None);
    }

    #[test]
    fn test_income_and_savings_never_spending() {
        let mut explicit_income = tx(300.0, "side-gig");
        explicit_income.kind = Some(TransactionKind::Income);
        let mut explicit_savings = tx(-75.0, "stash");
        explicit_savings.kind = Some(TransactionKind::Savings);

        let txs = vec![
            tx(-50.0, "savings"),
            tx(200.0, "income"),
            explicit_income,
            explicit_savings,
            tx(-10.0, "food"),
        ];
        let totals = CategoryTotals::from_transactions(&txs);

        assert!(!totals.spending_totals.contains_key("income"));
        assert!(!totals.spending_totals.contains_key("savings"));
        assert!(!totals.spending_totals.contains_key("side-gig"));
        assert!(!totals.spending_totals.contains_key("stash"));
        assert_eq!(totals.savings_total, 125.0);
        assert_eq!(totals.income_total, 500.0);
        assert_eq!(totals.total, 10.0);
    }

    #[test]
    fn test_separate_ledgers_fold_in() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let incomes = vec![Income {
            id: 1,
            user_id: 1,
            source: "Bursary".into(),
            amount: 1000.0,
            date: day,
            note: None,
        }];
        let savings = vec![SavingsTransfer {
            id: 1,
            user_id: 1,
            amount: -250.0,
            from: None,
            to: Some("Emergency Fund".into()),
            date: day,
        }];
        let totals = aggregate(&[tx(500.0, "income")], &incomes, &savings);
        assert_eq!(totals.income_total, 1500.0);
        assert_eq!(totals.savings_total, 250.0);
    }

    #[test]
    fn test_non_finite_counts_as_zero() {
        let txs = vec![tx(f64::NAN, "food"), tx(-5.0, "food")];
        let totals = CategoryTotals::from_transactions(&txs);
        assert_eq!(totals.spending_totals["food"], 5.0);
        assert_eq!(totals.total, 5.0);
    }

    #[test]
    fn test_categories_case_sensitive() {
        let txs = vec![tx(-5.0, "Food"), tx(-7.0, "food")];
        let totals = CategoryTotals::from_transactions(&txs);
        assert_eq!(totals.spending_totals.len(), 2);
    }

    #[test]
    fn test_total_is_sum_of_categories() {
        let txs: Vec<_> = (0..50)
            .map(|i| tx(-(i as f64) * 1.37, ["a", "b", "c"][i % 3]))
            .collect();
        let totals = CategoryTotals::from_transactions(&txs);
        let sum: f64 = totals.spending_totals.values().sum();
        assert_eq!(totals.total, sum);
    }

    #[test]
    fn test_top_category_and_percent() {
        let txs = vec![tx(-120.0, "food"), tx(-45.0, "transport")];
        let totals = CategoryTotals::from_transactions(&txs);
        assert_eq!(totals.top_category(), Some(("food", 120.0)));
        assert_eq!(totals.percent_of_total(120.0), 73);
    }
}
