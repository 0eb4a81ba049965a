//! FinancePlay Core Library
//!
//! Shared functionality for the FinancePlay budgeting coach:
//! - Snapshot aggregation: category totals, ranked goals, health score
//! - Insight engine for short dashboard observations
//! - Gamification rules (XP, levels, streaks, badges)
//! - Ledger state container for per-user records
//! - Coach prompt builder and pluggable LLM backends with a fallback reply
//! - Weekly report builder
//! - Database access and migrations
//! - Settings and prompt library with user overrides
//!
//! Every derived value takes the reference date explicitly, so the same
//! records and date always produce the same output.

pub mod aggregate;
pub mod ai;
pub mod budget;
pub mod coach;
pub mod config;
pub mod db;
pub mod error;
pub mod gamification;
pub mod goals;
pub mod health;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod report;
pub mod snapshot;

/// Test utilities including mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate, CategoryTotals};
pub use ai::{CoachBackend, CoachClient, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use budget::{overspent, OverspendFlag};
pub use coach::{Coach, CoachPromptBuilder, CoachReply, CoachRequest, CoachSource};
pub use config::Settings;
pub use db::Database;
pub use error::{Error, Result};
pub use gamification::Gamification;
pub use goals::{rank_goals, RankedGoal};
pub use health::{HealthCategory, HealthScore};
pub use insights::{Insight, InsightEngine, InsightKind};
pub use ledger::{Ledger, LedgerAction};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use report::{build_weekly_report, WeeklyReport};
pub use snapshot::{Dashboard, Snapshot};
