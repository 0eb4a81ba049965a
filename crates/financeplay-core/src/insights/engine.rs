//! Insight Engine - runs the registered rules in priority order

use chrono::NaiveDate;

use crate::aggregate::CategoryTotals;
use crate::gamification::Gamification;
use crate::goals::RankedGoal;

use super::types::{Insight, InsightKind};
use super::{GoalProgressRule, MotivationRule, TopSpendingRule};

/// Upper bound on insights returned to a client
pub const MAX_INSIGHTS: usize = 3;

/// Inputs available to insight rules
pub struct InsightContext<'a> {
    pub totals: &'a CategoryTotals,
    pub goals: &'a [RankedGoal],
    pub gamification: &'a Gamification,
    /// Reference date for deadline checks
    pub today: NaiveDate,
}

/// A single insight rule. Rules are pure; the same context always yields the
/// same result.
pub trait InsightRule: Send + Sync {
    /// Kind of insight this rule produces
    fn id(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce an insight, or nothing if the rule does not apply
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight>;
}

/// Ordered registry of insight rules
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules in priority order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(TopSpendingRule));
        engine.register(Box::new(GoalProgressRule));
        engine.register(Box::new(MotivationRule));

        engine
    }

    /// Append a rule; earlier rules win when the list is truncated
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule and return between one and [`MAX_INSIGHTS`] insights
    pub fn generate(&self, ctx: &InsightContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();

        for rule in &self.rules {
            if insights.len() == MAX_INSIGHTS {
                break;
            }
            match rule.evaluate(ctx) {
                Some(insight) => {
                    tracing::debug!(rule = rule.name(), kind = %insight.kind, "Insight produced");
                    insights.push(insight);
                }
                None => tracing::trace!(rule = rule.name(), "Rule not applicable"),
            }
        }

        if insights.is_empty() {
            insights.push(Insight::getting_started());
        }

        insights
    }

    /// Kinds of the registered rules, in order
    pub fn rule_kinds(&self) -> Vec<InsightKind> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryTotals;
    use crate::gamification::Gamification;
    use crate::goals::rank_goals;
    use crate::models::{Goal, Priority, Transaction, UserRecords};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    struct Always(InsightKind);

    impl InsightRule for Always {
        fn id(&self) -> InsightKind {
            self.0
        }

        fn name(&self) -> &'static str {
            "always"
        }

        fn evaluate(&self, _ctx: &InsightContext<'_>) -> Option<Insight> {
            Some(Insight::new(self.0, "x", "y"))
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_kinds(),
            [
                InsightKind::TopSpending,
                InsightKind::GoalProgress,
                InsightKind::LevelUp
            ]
        );
    }

    #[test]
    fn test_empty_context_falls_back() {
        let totals = CategoryTotals::default();
        let gamification = Gamification::derive(&UserRecords::default(), day());
        let ctx = InsightContext {
            totals: &totals,
            goals: &[],
            gamification: &gamification,
            today: day(),
        };

        let insights = InsightEngine::new().generate(&ctx);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::GettingStarted);
        assert_eq!(insights[0].title, "Start tracking your finances");
    }

    #[test]
    fn test_truncates_to_max() {
        let totals = CategoryTotals::default();
        let gamification = Gamification::derive(&UserRecords::default(), day());
        let ctx = InsightContext {
            totals: &totals,
            goals: &[],
            gamification: &gamification,
            today: day(),
        };

        let mut engine = InsightEngine { rules: vec![] };
        for _ in 0..5 {
            engine.register(Box::new(Always(InsightKind::Streak)));
        }
        assert_eq!(engine.generate(&ctx).len(), MAX_INSIGHTS);
    }

    #[test]
    fn test_zero_amount_category_is_top_spending() {
        let totals = CategoryTotals::from_transactions(&[Transaction {
            id: 1,
            user_id: 1,
            amount: 0.0,
            category: "food".into(),
            kind: None,
            description: String::new(),
            date: day(),
            account_id: None,
        }]);
        let gamification = Gamification::derive(&UserRecords::default(), day());
        let ctx = InsightContext {
            totals: &totals,
            goals: &[],
            gamification: &gamification,
            today: day(),
        };

        let kinds: Vec<_> = InsightEngine::new()
            .generate(&ctx)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(kinds, [InsightKind::TopSpending]);
    }

    #[test]
    fn test_undated_goal_gets_no_progress_insight() {
        let totals = CategoryTotals::default();
        let gamification = Gamification::derive(&UserRecords::default(), day());
        let goals = rank_goals(&[Goal {
            id: 1,
            user_id: 1,
            name: "NoDeadline".into(),
            target_amount: 100.0,
            current_amount: 40.0,
            deadline: None,
            priority: Priority::Medium,
        }]);
        let ctx = InsightContext {
            totals: &totals,
            goals: &goals,
            gamification: &gamification,
            today: day(),
        };

        let insights = InsightEngine::new().generate(&ctx);
        assert!(insights.iter().all(|i| i.kind != InsightKind::GoalProgress));
    }
}
