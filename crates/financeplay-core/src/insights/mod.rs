//! Insight Engine - short, actionable observations for the dashboard
//!
//! Rules run in a fixed priority order and the engine keeps at most three
//! results. When no rule applies a "start tracking" insight is returned, so
//! callers always get at least one.
//!
//! ## Built-in rules
//!
//! - **Top Spending** - largest category and its share of spend
//! - **Goal Progress** - active goal closest to completion
//! - **Motivation** - next level within reach, or a long streak
//!
//! ## Usage
//!
//! ```rust,ignore
//! use financeplay_core::insights::{InsightContext, InsightEngine};
//!
//! let ctx = InsightContext { totals: &totals, goals: &ranked, gamification: &g, today };
//! let insights = InsightEngine::new().generate(&ctx);
//! ```

pub mod engine;
pub mod goal_progress;
pub mod motivation;
pub mod top_spending;
pub mod types;

pub use engine::{InsightContext, InsightEngine, InsightRule, MAX_INSIGHTS};
pub use goal_progress::GoalProgressRule;
pub use motivation::MotivationRule;
pub use top_spending::TopSpendingRule;
pub use types::{Insight, InsightKind};
