//! Dashboard snapshot
//!
//! A snapshot is the request-scoped view of one user's finances: records in
//! display order plus every derived figure. It is rebuilt on each read and
//! never stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CategoryTotals};
use crate::gamification::Gamification;
use crate::goals::{rank_goals, RankedGoal};
use crate::health::{score_totals, HealthScore};
use crate::insights::{Insight, InsightContext, InsightEngine};
use crate::models::{
    BudgetCategory, Bursary, DiaryEntry, Goal, Income, SavingsTransfer, Transaction, User,
    UserRecords,
};

/// Headline totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub spending: f64,
    pub income: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub user: Option<User>,
    /// Reference date the derived values were computed for
    pub as_of: NaiveDate,
    pub totals: Totals,
    /// Spend per category
    pub categories: BTreeMap<String, f64>,
    /// Newest first
    pub transactions: Vec<Transaction>,
    /// Newest first
    pub incomes: Vec<Income>,
    /// Newest first
    pub savings: Vec<SavingsTransfer>,
    /// Priority order
    pub goals: Vec<RankedGoal>,
    /// Soonest payment first
    pub bursaries: Vec<Bursary>,
    pub budget_categories: Vec<BudgetCategory>,
    /// Newest first
    pub diary: Vec<DiaryEntry>,
    pub gamification: Gamification,
}

impl Snapshot {
    pub fn build(records: &UserRecords, today: NaiveDate) -> Self {
        let mut transactions = records.transactions.clone();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        let mut incomes = records.incomes.clone();
        incomes.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        let mut savings = records.savings.clone();
        savings.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        let mut diary = records.diary.clone();
        diary.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        let mut bursaries = records.bursaries.clone();
        bursaries.sort_by(|a, b| a.next_payment_date.cmp(&b.next_payment_date));

        let totals = aggregate(&transactions, &incomes, &savings);

        Self {
            user: records.user.clone(),
            as_of: today,
            totals: Totals {
                spending: totals.total,
                income: totals.income_total,
                savings: totals.savings_total,
            },
            categories: totals.spending_totals,
            transactions,
            incomes,
            savings,
            goals: rank_goals(&records.goals),
            bursaries,
            budget_categories: records.budget_categories.clone(),
            diary,
            gamification: Gamification::derive(records, today),
        }
    }

    /// Totals in aggregator form
    pub fn category_totals(&self) -> CategoryTotals {
        CategoryTotals {
            spending_totals: self.categories.clone(),
            savings_total: self.totals.savings,
            income_total: self.totals.income,
            total: self.totals.spending,
        }
    }

    /// Goals without ranking metadata
    pub fn plain_goals(&self) -> Vec<Goal> {
        self.goals.iter().map(|g| g.goal.clone()).collect()
    }

    pub fn health(&self) -> HealthScore {
        score_totals(&self.category_totals(), &self.plain_goals())
    }

    pub fn insights(&self) -> Vec<Insight> {
        let totals = self.category_totals();
        let ctx = InsightContext {
            totals: &totals,
            goals: &self.goals,
            gamification: &self.gamification,
            today: self.as_of,
        };
        InsightEngine::new().generate(&ctx)
    }
}

/// Snapshot plus health score and insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub snapshot: Snapshot,
    pub health: HealthScore,
    pub insights: Vec<Insight>,
}

impl Dashboard {
    pub fn build(records: &UserRecords, today: NaiveDate) -> Self {
        Self::from_snapshot(Snapshot::build(records, today))
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let health = snapshot.health();
        let insights = snapshot.insights();
        Self {
            snapshot,
            health,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthCategory;
    use crate::insights::InsightKind;
    use crate::models::{GamificationState, Priority, TransactionKind};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn tx(id: i64, amount: f64, category: &str, d: u32) -> Transaction {
        Transaction {
            id,
            user_id: 1,
            amount,
            category: category.into(),
            kind: None,
            description: String::new(),
            date: day(d),
            account_id: None,
        }
    }

    fn sample() -> UserRecords {
        UserRecords {
            transactions: vec![
                tx(1, -120.0, "food", 2),
                tx(2, -45.0, "transport", 5),
                tx(3, 1800.0, "income", 1),
            ],
            goals: vec![
                Goal {
                    id: 1,
                    user_id: 1,
                    name: "B".into(),
                    target_amount: 1500.0,
                    current_amount: 800.0,
                    deadline: None,
                    priority: Priority::Medium,
                },
                Goal {
                    id: 2,
                    user_id: 1,
                    name: "A".into(),
                    target_amount: 5000.0,
                    current_amount: 2400.0,
                    deadline: None,
                    priority: Priority::High,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_orders_and_totals() {
        let snapshot = Snapshot::build(&sample(), day(6));

        let ids: Vec<_> = snapshot.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 1, 3]);
        assert_eq!(snapshot.totals.spending, 165.0);
        assert_eq!(snapshot.totals.income, 1800.0);
        assert_eq!(snapshot.categories.len(), 2);

        let names: Vec<_> = snapshot.goals.iter().map(|g| g.goal.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_camel_case_payload() {
        let snapshot = Snapshot::build(&sample(), day(6));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totals"]["spending"], 165.0);
        assert_eq!(json["goals"][0]["percentComplete"], 48);
        assert_eq!(json["goals"][0]["targetAmount"], 5000.0);
        assert!(json["budgetCategories"].is_array());
        assert_eq!(json["gamification"]["dailyChallenge"], "Add your first transaction");
        assert_eq!(json["asOf"], "2024-05-06");
    }

    #[test]
    fn test_dashboard() {
        let dashboard = Dashboard::build(&sample(), day(6));
        assert!(!dashboard.insights.is_empty() && dashboard.insights.len() <= 3);
        assert_eq!(dashboard.insights[0].kind, InsightKind::TopSpending);
        // 0% saved, 9% spent, goals average 50.7%
        assert_eq!(dashboard.health.score, 90);
        assert_eq!(dashboard.health.category, HealthCategory::Good);
    }

    #[test]
    fn test_empty_records() {
        let dashboard = Dashboard::build(&UserRecords::default(), day(6));
        assert_eq!(dashboard.snapshot.totals, Totals::default());
        assert_eq!(dashboard.health.score, 50);
        assert_eq!(dashboard.insights.len(), 1);
        assert_eq!(dashboard.insights[0].kind, InsightKind::GettingStarted);
        assert_eq!(dashboard.snapshot.gamification.level, 1);
    }

    #[test]
    fn test_gamification_from_state() {
        let mut records = sample();
        records.gamification = GamificationState {
            xp: 900,
            ..Default::default()
        };
        records.transactions.push(Transaction {
            kind: Some(TransactionKind::Savings),
            ..tx(4, 100.0, "stash", 6)
        });
        let snapshot = Snapshot::build(&records, day(6));
        assert_eq!(snapshot.gamification.level, 2);
        assert_eq!(snapshot.gamification.streak, 2);
        assert_eq!(snapshot.totals.savings, 100.0);
        assert!(snapshot
            .gamification
            .badges
            .contains(&"first-savings".to_string()));
    }
}
