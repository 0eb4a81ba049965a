//! Goal ranking and completion

use serde::{Deserialize, Serialize};

use crate::models::{finite_or_zero, Goal};

/// A goal together with its completion percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedGoal {
    #[serde(flatten)]
    pub goal: Goal,
    pub percent_complete: u8,
}

impl RankedGoal {
    /// Amount still needed, never negative
    pub fn remaining(&self) -> f64 {
        (finite_or_zero(self.goal.target_amount) - finite_or_zero(self.goal.current_amount))
            .max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.goal.target_amount > 0.0 && self.goal.current_amount >= self.goal.target_amount
    }
}

/// Raw progress ratio, uncapped. Targets of 0 (or less) give 0.
pub fn progress_ratio(current: f64, target: f64) -> f64 {
    let current = finite_or_zero(current);
    let target = finite_or_zero(target);
    if target <= 0.0 {
        return 0.0;
    }
    current / target
}

/// Whole-percent completion, clamped to 0..=100
pub fn percent_complete(current: f64, target: f64) -> u8 {
    let percent = (progress_ratio(current, target) * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Order goals high → medium → low. The sort is stable, so goals of the
/// same priority keep their input order.
pub fn rank_goals(goals: &[Goal]) -> Vec<RankedGoal> {
    let mut ranked: Vec<RankedGoal> = goals
        .iter()
        .map(|goal| RankedGoal {
            percent_complete: percent_complete(goal.current_amount, goal.target_amount),
            goal: goal.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.goal.priority.weight().cmp(&a.goal.priority.weight()));
    ranked
}
