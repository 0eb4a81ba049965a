//! XP, levels, streaks and badges
//!
//! Only the XP counter, persona and daily challenge are stored. Everything
//! else here is derived from the user's records at read time.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{finite_or_zero, Persona, TransactionKind, UserRecords};

pub const XP_PER_LEVEL: i64 = 500;

/// Flat award for writing a diary entry
pub const DIARY_XP: i64 = 20;

/// Diary entries needed for the `journaler` badge
const JOURNALER_ENTRIES: usize = 5;

/// Streak length for the `streak-7` badge
const STREAK_BADGE_DAYS: u32 = 7;

pub fn level_from_xp(xp: i64) -> i64 {
    xp.max(0) / XP_PER_LEVEL + 1
}

/// XP still needed to reach the next level
pub fn xp_to_next_level(level: i64, xp: i64) -> i64 {
    level * XP_PER_LEVEL - xp
}

/// XP earned for moving money toward savings or a goal
pub fn xp_for_amount(amount: f64) -> i64 {
    let amount = finite_or_zero(amount);
    if amount <= 0.0 {
        0
    } else if amount >= 1000.0 {
        200
    } else if amount >= 500.0 {
        120
    } else {
        60
    }
}

/// Consecutive active days ending today, or ending yesterday when nothing
/// has been recorded yet today.
pub fn compute_streak<I>(activity: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = activity.into_iter().filter(|d| *d <= today).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Derived gamification view returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gamification {
    pub level: i64,
    pub xp: i64,
    pub xp_to_next_level: i64,
    pub streak: u32,
    pub persona: Persona,
    pub daily_challenge: String,
    pub badges: Vec<String>,
}

impl Gamification {
    pub fn derive(records: &UserRecords, today: NaiveDate) -> Self {
        let state = &records.gamification;
        let level = level_from_xp(state.xp);

        let activity = records
            .transactions
            .iter()
            .map(|t| t.date)
            .chain(records.incomes.iter().map(|i| i.date))
            .chain(records.savings.iter().map(|s| s.date))
            .chain(records.diary.iter().map(|d| d.date));
        let streak = compute_streak(activity, today);

        Self {
            level,
            xp: state.xp,
            xp_to_next_level: xp_to_next_level(level, state.xp),
            streak,
            persona: state.persona,
            daily_challenge: state.daily_challenge.clone(),
            badges: derive_badges(records, streak),
        }
    }
}

/// Badges earned by history, in a fixed order
pub fn derive_badges(records: &UserRecords, streak: u32) -> Vec<String> {
    let mut badges = Vec::new();

    if !records.transactions.is_empty() {
        badges.push("first-transaction");
    }

    let saved = !records.savings.is_empty()
        || records
            .transactions
            .iter()
            .any(|t| t.resolved_kind() == TransactionKind::Savings);
    if saved {
        badges.push("first-savings");
    }

    if records
        .goals
        .iter()
        .any(|g| g.target_amount > 0.0 && g.current_amount >= g.target_amount)
    {
        badges.push("goal-crusher");
    }

    if records.diary.len() >= JOURNALER_ENTRIES {
        badges.push("journaler");
    }

    if streak >= STREAK_BADGE_DAYS {
        badges.push("streak-7");
    }

    badges.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiaryEntry, GamificationState, Goal, Priority, Transaction};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(499), 1);
        assert_eq!(level_from_xp(500), 2);
        assert_eq!(level_from_xp(1250), 3);
        assert_eq!(level_from_xp(-40), 1);
        assert_eq!(xp_to_next_level(3, 1250), 250);
    }

    #[test]
    fn test_xp_for_amount() {
        assert_eq!(xp_for_amount(0.0), 0);
        assert_eq!(xp_for_amount(-10.0), 0);
        assert_eq!(xp_for_amount(f64::NAN), 0);
        assert_eq!(xp_for_amount(20.0), 60);
        assert_eq!(xp_for_amount(500.0), 120);
        assert_eq!(xp_for_amount(999.99), 120);
        assert_eq!(xp_for_amount(1000.0), 200);
    }

    #[test]
    fn test_streak() {
        let today = day(10);
        assert_eq!(compute_streak(Vec::<NaiveDate>::new(), today), 0);
        assert_eq!(compute_streak(vec![day(10), day(9), day(8)], today), 3);
        // Yesterday still counts when nothing was logged today
        assert_eq!(compute_streak(vec![day(9), day(8)], today), 2);
        // Gap breaks it
        assert_eq!(compute_streak(vec![day(10), day(8)], today), 1);
        assert_eq!(compute_streak(vec![day(7)], today), 0);
        // Duplicates and future dates ignored
        assert_eq!(compute_streak(vec![day(10), day(10), day(12)], today), 1);
    }

    #[test]
    fn test_new_user_defaults() {
        let g = Gamification::derive(&UserRecords::default(), day(1));
        assert_eq!(g.level, 1);
        assert_eq!(g.xp, 0);
        assert_eq!(g.xp_to_next_level, 500);
        assert_eq!(g.streak, 0);
        assert_eq!(g.persona, Persona::Friendly);
        assert_eq!(g.daily_challenge, "Add your first transaction");
        assert!(g.badges.is_empty());
    }

    #[test]
    fn test_badges() {
        let mut records = UserRecords {
            gamification: GamificationState {
                xp: 620,
                ..Default::default()
            },
            ..Default::default()
        };
        for d in 1..=7 {
            records.transactions.push(Transaction {
                id: d as i64,
                user_id: 1,
                amount: -10.0,
                category: if d == 3 { "savings" } else { "food" }.to_string(),
                kind: None,
                description: String::new(),
                date: day(d),
                account_id: None,
            });
            records.diary.push(DiaryEntry {
                id: d as i64,
                user_id: 1,
                title: None,
                body: "ok".into(),
                emotion: None,
                date: day(d),
            });
        }
        records.goals.push(Goal {
            id: 1,
            user_id: 1,
            name: "Phone".into(),
            target_amount: 100.0,
            current_amount: 100.0,
            deadline: None,
            priority: Priority::High,
        });

        let g = Gamification::derive(&records, day(7));
        assert_eq!(g.level, 2);
        assert_eq!(g.streak, 7);
        assert_eq!(
            g.badges,
            [
                "first-transaction",
                "first-savings",
                "goal-crusher",
                "journaler",
                "streak-7"
            ]
        );
    }
}
