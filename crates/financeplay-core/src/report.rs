//! Weekly report
//!
//! A structured summary of the trailing seven days. The same data renders as
//! JSON for clients or as plain text for the CLI and for external renderers.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::budget::overspent;
use crate::coach::prompt::truncate_chars;
use crate::gamification::xp_for_amount;
use crate::models::{format_money, Income, SavingsTransfer, Transaction};
use crate::snapshot::Snapshot;

/// Days covered by a weekly report, today included
pub const WEEK_DAYS: i64 = 7;

const DIARY_NOTES: usize = 3;
const DIARY_NOTE_CHARS: usize = 80;
const SUGGESTED_SAVINGS: f64 = 200.0;

/// Whether `date` falls within the seven days ending on `today`
pub fn in_trailing_week(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today && date > today - Duration::days(WEEK_DAYS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub points: Vec<String>,
}

impl ReportSection {
    fn new(heading: &str, points: Vec<String>, placeholder: &str) -> Self {
        let points = if points.is_empty() {
            vec![placeholder.to_string()]
        } else {
            points
        };
        Self {
            heading: heading.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl WeeklyReport {
    /// Plain-text rendering: title, then each section as a bulleted list
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.heading);
            out.push('\n');
            out.push_str(&"-".repeat(section.heading.chars().count()));
            out.push('\n');
            for point in &section.points {
                out.push_str("  • ");
                out.push_str(point);
                out.push('\n');
            }
        }
        out
    }
}

pub fn build_weekly_report(snapshot: &Snapshot, today: NaiveDate) -> WeeklyReport {
    let week_transactions: Vec<Transaction> = snapshot
        .transactions
        .iter()
        .filter(|t| in_trailing_week(t.date, today))
        .cloned()
        .collect();
    let week_incomes: Vec<Income> = snapshot
        .incomes
        .iter()
        .filter(|i| in_trailing_week(i.date, today))
        .cloned()
        .collect();
    let week_savings: Vec<SavingsTransfer> = snapshot
        .savings
        .iter()
        .filter(|s| in_trailing_week(s.date, today))
        .cloned()
        .collect();
    let week = aggregate(&week_transactions, &week_incomes, &week_savings);

    let title = format!(
        "You spent {} and saved {} this week.",
        format_money(week.total),
        format_money(week.savings_total)
    );

    let gamification = &snapshot.gamification;

    let mut highlights = Vec::new();
    if let Some(top) = snapshot.goals.first() {
        highlights.push(format!(
            "Top goal: {} progress {}/{} ({}%)",
            top.goal.name,
            format_money(top.goal.current_amount),
            format_money(top.goal.target_amount),
            top.percent_complete
        ));
    } else {
        highlights.push("No goals set yet".to_string());
    }
    highlights.push(format!(
        "Streak: {} days, XP {}",
        gamification.streak, gamification.xp
    ));

    let flags = overspent(&snapshot.categories, &snapshot.budget_categories)
        .into_iter()
        .map(|f| {
            format!(
                "{}: {} / {}{}",
                f.category,
                format_money(f.spent),
                format_money(f.limit),
                if f.exceeded { " (over limit)" } else { "" }
            )
        })
        .collect();

    let mut challenges = Vec::new();
    if let Some((category, amount)) = week.top_category() {
        challenges.push(format!(
            "Cut {} spend by 10% next week (about {})",
            category,
            format_money(amount * 0.1)
        ));
    }
    challenges.push(format!(
        "Move {} to savings for +{} XP ({} XP to level {})",
        format_money(SUGGESTED_SAVINGS),
        xp_for_amount(SUGGESTED_SAVINGS),
        gamification.xp_to_next_level,
        gamification.level + 1
    ));

    let diary = snapshot
        .diary
        .iter()
        .take(DIARY_NOTES)
        .map(|d| {
            format!(
                "{}: {}",
                d.emotion.as_deref().unwrap_or("neutral"),
                truncate_chars(&d.body, DIARY_NOTE_CHARS)
            )
        })
        .collect();

    let allowances = snapshot
        .bursaries
        .iter()
        .map(|b| {
            format!(
                "{} {} next on {}",
                b.provider,
                format_money(b.monthly_amount),
                b.next_payment_date
            )
        })
        .collect();

    WeeklyReport {
        title,
        sections: vec![
            ReportSection::new("Highlights", highlights, ""),
            ReportSection::new("Overspending flags", flags, "No overspending detected"),
            ReportSection::new("Challenges", challenges, ""),
            ReportSection::new("Diary & Mood", diary, "No diary entries captured"),
            ReportSection::new("Allowances", allowances, "No allowance payments scheduled"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCategory, Bursary, DiaryEntry, UserRecords};

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

    #[test]
    fn test_trailing_week() {
        let today = day(14);
        assert!(in_trailing_week(day(14), today));
        assert!(in_trailing_week(day(8), today));
        assert!(!in_trailing_week(day(7), today));
        assert!(!in_trailing_week(day(15), today));
    }

    #[test]
    fn test_empty_report_placeholders() {
        let snapshot = Snapshot::build(&UserRecords::default(), day(14));
        let report = build_weekly_report(&snapshot, day(14));

        assert_eq!(report.title, "You spent R0 and saved R0 this week.");
        let headings: Vec<_> = report.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            [
                "Highlights",
                "Overspending flags",
                "Challenges",
                "Diary & Mood",
                "Allowances"
            ]
        );
        assert_eq!(report.sections[0].points[0], "No goals set yet");
        assert_eq!(report.sections[1].points, ["No overspending detected"]);
        assert_eq!(report.sections[3].points, ["No diary entries captured"]);
        assert_eq!(report.sections[4].points, ["No allowance payments scheduled"]);
        assert!(report.sections.iter().all(|s| !s.points.is_empty()));
    }

    #[test]
    fn test_week_window_and_sections() {
        let mut records = UserRecords {
            transactions: vec![
                tx(1, -300.0, "food", 13),
                tx(2, -999.0, "rent", 1),
                tx(3, -50.0, "savings", 12),
                tx(4, -150.0, "transport", 10),
            ],
            budget_categories: vec![BudgetCategory {
                id: 1,
                user_id: 1,
                name: "rent".into(),
                limit: Some(900.0),
                icon: None,
            }],
            bursaries: vec![Bursary {
                id: 1,
                user_id: 1,
                provider: "NSFAS".into(),
                monthly_amount: 1500.0,
                next_payment_date: day(15),
                notes: None,
            }],
            ..Default::default()
        };
        for i in 0..4 {
            records.diary.push(DiaryEntry {
                id: i,
                user_id: 1,
                title: None,
                body: format!("{}{}", i, "y".repeat(100)),
                emotion: None,
                date: day(10 + i as u32),
            });
        }

        let snapshot = Snapshot::build(&records, day(14));
        let report = build_weekly_report(&snapshot, day(14));

        assert_eq!(report.title, "You spent R450 and saved R50 this week.");
        assert_eq!(report.sections[1].points, ["rent: R999 / R900 (over limit)"]);
        assert_eq!(
            report.sections[2].points[0],
            "Cut food spend by 10% next week (about R30)"
        );
        assert_eq!(report.sections[3].points.len(), 3);
        assert!(report.sections[3].points[0].starts_with("neutral: 3"));
        assert_eq!(report.sections[3].points[0].chars().count(), "neutral: ".len() + 80);
        assert_eq!(report.sections[4].points, ["NSFAS R1500 next on 2024-05-15"]);
    }

    #[test]
    fn test_to_text() {
        let report = WeeklyReport {
            title: "T".into(),
            sections: vec![ReportSection {
                heading: "Highlights".into(),
                points: vec!["a".into(), "b".into()],
            }],
        };
        assert_eq!(report.to_text(), "T\n\nHighlights\n----------\n  • a\n  • b\n");
    }
}
