//! Motivation Insight
//!
//! Celebrates a level that is nearly reached, or failing that a long streak.

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind};

/// XP distance at which the next level counts as within reach
const LEVEL_UP_WINDOW: i64 = 200;

/// Streak length worth celebrating
const STREAK_CELEBRATION_DAYS: u32 = 5;

pub struct MotivationRule;

impl InsightRule for MotivationRule {
    fn id(&self) -> InsightKind {
        InsightKind::LevelUp
    }

    fn name(&self) -> &'static str {
        "Motivation"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let gamification = ctx.gamification;
        let xp_needed = gamification.xp_to_next_level;

        if xp_needed <= LEVEL_UP_WINDOW {
            return Some(
                Insight::new(
                    InsightKind::LevelUp,
                    format!("Level {} is within reach!", gamification.level + 1),
                    format!(
                        "You're only {} XP away from leveling up. Complete transactions or reach goals to earn XP.",
                        xp_needed
                    ),
                )
                .with_action("Add a transaction to earn XP"),
            );
        }

        if gamification.streak >= STREAK_CELEBRATION_DAYS {
            return Some(
                Insight::new(
                    InsightKind::Streak,
                    format!("🔥 {}-day streak!", gamification.streak),
                    "You're on fire! Keep tracking your finances daily to maintain your streak and earn bonus XP.",
                )
                .with_action("Continue your streak tomorrow"),
            );
        }

        None
    }
}
