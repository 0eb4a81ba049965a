//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Largest spending category
    TopSpending,
    /// Active goal closest to completion
    GoalProgress,
    /// Next level is close
    LevelUp,
    /// Long tracking streak
    Streak,
    /// Nothing to analyze yet
    GettingStarted,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::TopSpending => "top_spending",
            InsightKind::GoalProgress => "goal_progress",
            InsightKind::LevelUp => "level_up",
            InsightKind::Streak => "streak",
            InsightKind::GettingStarted => "getting_started",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_spending" => Ok(InsightKind::TopSpending),
            "goal_progress" => Ok(InsightKind::GoalProgress),
            "level_up" => Ok(InsightKind::LevelUp),
            "streak" => Ok(InsightKind::Streak),
            "getting_started" => Ok(InsightKind::GettingStarted),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A short natural-language observation with an optional next step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            action: None,
        }
    }

    /// Builder: attach a suggested action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Shown when no rule has anything to say
    pub fn getting_started() -> Self {
        Self::new(
            InsightKind::GettingStarted,
            "Start tracking your finances",
            "Add transactions to get personalized insights about your spending habits and financial health.",
        )
        .with_action("Add your first transaction")
    }
}
