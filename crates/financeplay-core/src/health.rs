//! Financial health scoring
//!
//! A heuristic 0-100 score built from three signals: how much of income is
//! saved, how much of it is spent, and average goal progress. The score
//! starts at 50 and each signal moves it up or down.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, CategoryTotals};
use crate::goals::progress_ratio;
use crate::models::{Goal, Transaction};

const BASE_SCORE: i32 = 50;

/// Health band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCategory {
    Poor,
    Fair,
    Good,
}

impl HealthCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
        }
    }

    fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::Good
        } else if score >= 40 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Good => {
                "Great job! You're saving consistently and making progress on your goals."
            }
            Self::Fair => {
                "You're on track, but there's room for improvement. Try reducing spending or increasing savings."
            }
            Self::Poor => {
                "Your finances need attention. Focus on tracking expenses and creating a budget."
            }
        }
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub category: HealthCategory,
    pub summary: String,
}

/// Score already-aggregated totals against a set of goals
pub fn score_totals(totals: &CategoryTotals, goals: &[Goal]) -> HealthScore {
    let mut score = BASE_SCORE;

    if totals.income_total > 0.0 {
        let savings_rate = totals.savings_total / totals.income_total * 100.0;
        score += if savings_rate >= 20.0 {
            30
        } else if savings_rate >= 10.0 {
            20
        } else if savings_rate >= 5.0 {
            10
        } else {
            0
        };

        let spending_rate = totals.total / totals.income_total * 100.0;
        score += if spending_rate <= 60.0 {
            20
        } else if spending_rate <= 80.0 {
            10
        } else if spending_rate > 100.0 {
            -10
        } else {
            0
        };
    }

    if !goals.is_empty() {
        let mean_progress = goals
            .iter()
            .map(|g| progress_ratio(g.current_amount, g.target_amount) * 100.0)
            .sum::<f64>()
            / goals.len() as f64;
        score += if mean_progress >= 50.0 {
            20
        } else if mean_progress >= 25.0 {
            10
        } else if mean_progress > 0.0 {
            5
        } else {
            0
        };
    }

    let score = score.clamp(0, 100) as u8;
    let category = HealthCategory::from_score(score);

    HealthScore {
        score,
        category,
        summary: category.summary().to_string(),
    }
}

/// Score raw transactions (income and savings folded in via their kind)
pub fn score(transactions: &[Transaction], goals: &[Goal]) -> HealthScore {
    score_totals(&aggregate(transactions, &[], &[]), goals)
}
