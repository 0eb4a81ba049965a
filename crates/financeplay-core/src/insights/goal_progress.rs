//! Goal Progress Insight
//!
//! Picks the active goal closest to completion. A goal is active when it has
//! a deadline still ahead and is not yet reached.

use crate::goals::{percent_complete, progress_ratio, RankedGoal};
use crate::models::format_money;

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind};

/// Largest top-up suggested in one go
const MAX_SUGGESTED_TOP_UP: f64 = 200.0;

pub struct GoalProgressRule;

impl GoalProgressRule {
    fn closest<'a>(ctx: &InsightContext<'a>) -> Option<&'a RankedGoal> {
        let mut best: Option<(&RankedGoal, f64)> = None;

        for ranked in ctx.goals {
            let goal = &ranked.goal;
            if goal.target_amount <= 0.0 {
                continue;
            }
            if !goal.deadline.is_some_and(|d| d > ctx.today) {
                continue;
            }
            let ratio = progress_ratio(goal.current_amount, goal.target_amount);
            if ratio >= 1.0 {
                continue;
            }
            // Strictly greater keeps the first goal on ties
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((ranked, ratio));
            }
        }

        best.map(|(g, _)| g)
    }
}

impl InsightRule for GoalProgressRule {
    fn id(&self) -> InsightKind {
        InsightKind::GoalProgress
    }

    fn name(&self) -> &'static str {
        "Goal Progress"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let ranked = Self::closest(ctx)?;
        let goal = &ranked.goal;
        let progress = percent_complete(goal.current_amount, goal.target_amount);
        let remaining = ranked.remaining();

        Some(
            Insight::new(
                InsightKind::GoalProgress,
                format!("{} is {}% complete", goal.name, progress),
                format!(
                    "You need {} more to reach your goal. Keep up the great work!",
                    format_money(remaining)
                ),
            )
            .with_action(format!(
                "Add {} to {}",
                format_money(remaining.min(MAX_SUGGESTED_TOP_UP)),
                goal.name
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryTotals;
    use crate::gamification::Gamification;
    use crate::goals::rank_goals;
    use crate::models::{Goal, Priority, UserRecords};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn goal(name: &str, target: f64, current: f64, deadline: Option<NaiveDate>) -> Goal {
        Goal {
            id: 0,
            user_id: 1,
            name: name.into(),
            target_amount: target,
            current_amount: current,
            deadline,
            priority: Priority::Medium,
        }
    }

    fn run(goals: &[Goal], today: NaiveDate) -> Option<Insight> {
        let totals = CategoryTotals::default();
        let gamification = Gamification::derive(&UserRecords::default(), today);
        let ranked = rank_goals(goals);
        let ctx = InsightContext {
            totals: &totals,
            goals: &ranked,
            gamification: &gamification,
            today,
        };
        GoalProgressRule.evaluate(&ctx)
    }

    #[test]
    fn test_picks_highest_active() {
        let today = date(6, 1);
        let goals = vec![
            goal("Laptop", 1000.0, 300.0, Some(date(12, 1))),
            goal("Trip", 1000.0, 900.0, Some(date(5, 1))),
            goal("Phone", 500.0, 400.0, Some(date(9, 1))),
            goal("Undated", 100.0, 95.0, None),
            goal("Done", 100.0, 100.0, Some(date(12, 1))),
        ];
        let insight = run(&goals, today).unwrap();
        assert_eq!(insight.title, "Phone is 80% complete");
        assert_eq!(
            insight.description,
            "You need R100 more to reach your goal. Keep up the great work!"
        );
        assert_eq!(insight.action.as_deref(), Some("Add R100 to Phone"));
    }

    #[test]
    fn test_undated_goal_is_not_active() {
        let goals = vec![goal("NoDeadline", 100.0, 40.0, None)];
        assert!(run(&goals, date(6, 1)).is_none());
    }

    #[test]
    fn test_top_up_capped() {
        let insight = run(&[goal("Car", 5000.0, 1000.0, Some(date(12, 1)))], date(6, 1)).unwrap();
        assert_eq!(insight.action.as_deref(), Some("Add R200 to Car"));
    }

    #[test]
    fn test_tie_keeps_first() {
        let goals = vec![
            goal("First", 100.0, 50.0, Some(date(12, 1))),
            goal("Second", 10.0, 5.0, Some(date(12, 1))),
        ];
        let insight = run(&goals, date(6, 1)).unwrap();
        assert!(insight.title.starts_with("First"));
    }

    #[test]
    fn test_none_active() {
        let today = date(6, 1);
        let goals = vec![
            goal("Expired", 100.0, 10.0, Some(today)),
            goal("Reached", 100.0, 120.0, Some(date(12, 1))),
        ];
        assert!(run(&goals, today).is_none());
        assert!(run(&[], today).is_none());
    }
}
