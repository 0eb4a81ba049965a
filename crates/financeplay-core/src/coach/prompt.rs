//! Coach prompt assembly
//!
//! Turns a snapshot into the text sent to the model. Pure: no I/O and no
//! clock reads; the reference date comes in with the request. Every section
//! renders something, with a placeholder when there is no data.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::budget::overspent;
use crate::error::Result;
use crate::models::{ChatTurn, Persona, TransactionKind};
use crate::prompts::{Prompt, PromptId, PromptLibrary};
use crate::report::in_trailing_week;
use crate::snapshot::Snapshot;

const NONE: &str = "none";
const UNKNOWN: &str = "unknown";
const NO_DIARY: &str = "no diary entries";
const NO_TRANSACTIONS: &str = "no transactions";
const INSUFFICIENT_DATA: &str = "insufficient data";
const NO_OVERSPEND: &str = "no overspending detected";

/// Diary entries quoted in a prompt
const DIARY_EXCERPTS: usize = 5;
/// Characters kept from each diary body
const DIARY_EXCERPT_CHARS: usize = 120;

/// Inputs for one coaching turn
#[derive(Debug, Clone)]
pub struct CoachRequest<'a> {
    pub user_prompt: &'a str,
    pub persona: Persona,
    pub history: &'a [ChatTurn],
    pub snapshot: Option<&'a Snapshot>,
    pub today: NaiveDate,
}

/// Renders coach prompts from a template
#[derive(Debug, Clone)]
pub struct CoachPromptBuilder {
    prompt: Prompt,
}

impl CoachPromptBuilder {
    pub fn new(prompt: Prompt) -> Self {
        Self { prompt }
    }

    /// Builder over the compiled-in template
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(Prompt::embedded(PromptId::Coach)?))
    }

    /// Builder over the library's template, honoring overrides
    pub fn from_library(library: &mut PromptLibrary) -> Result<Self> {
        Ok(Self::new(library.get(PromptId::Coach)?.clone()))
    }

    pub fn build(&self, request: &CoachRequest<'_>) -> String {
        self.prompt.render(&variables(request))
    }
}

/// Template variables for a request
pub fn variables(request: &CoachRequest<'_>) -> HashMap<&'static str, String> {
    let snapshot = request.snapshot;
    let mut vars = HashMap::new();

    vars.insert("persona", request.persona.as_str().to_string());
    vars.insert("persona_tone", request.persona.tone().to_string());
    vars.insert("user_prompt", request.user_prompt.to_string());
    vars.insert("history", render_history(request.history));
    vars.insert("totals", snapshot.map_or_else(|| UNKNOWN.into(), render_totals));
    vars.insert("categories", snapshot.map_or_else(|| NONE.into(), render_categories));
    vars.insert("overspend", snapshot.map_or_else(|| UNKNOWN.into(), render_overspend));
    vars.insert("goals", snapshot.map_or_else(|| NONE.into(), render_goals));
    vars.insert("diary", snapshot.map_or_else(|| NO_DIARY.into(), render_diary));
    vars.insert("bursaries", snapshot.map_or_else(|| NONE.into(), render_bursaries));
    vars.insert("incomes", snapshot.map_or_else(|| NONE.into(), render_incomes));
    vars.insert("savings", snapshot.map_or_else(|| NONE.into(), render_savings));
    vars.insert(
        "trend",
        snapshot.map_or_else(|| NO_TRANSACTIONS.into(), |s| render_trend(s, request.today)),
    );
    vars.insert(
        "forecast",
        snapshot.map_or_else(
            || INSUFFICIENT_DATA.into(),
            |s| render_forecast(s, request.today),
        ),
    );
    vars.insert(
        "gamification",
        snapshot.map_or_else(|| UNKNOWN.into(), render_gamification),
    );

    vars
}

fn or_placeholder(parts: Vec<String>, placeholder: &str) -> String {
    if parts.is_empty() {
        placeholder.to_string()
    } else {
        parts.join("; ")
    }
}

fn render_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return NONE.to_string();
    }
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_totals(s: &Snapshot) -> String {
    format!(
        "spending={:.2}, income={:.2}, savings={:.2}",
        s.totals.spending, s.totals.income, s.totals.savings
    )
}

fn render_categories(s: &Snapshot) -> String {
    if s.categories.is_empty() {
        return NONE.to_string();
    }
    s.categories
        .iter()
        .map(|(name, amount)| format!("{}={:.2}", name, amount))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_overspend(s: &Snapshot) -> String {
    let flags = overspent(&s.categories, &s.budget_categories)
        .into_iter()
        .map(|f| format!("{}: {:.2} / {:.2}", f.category, f.spent, f.limit))
        .collect();
    or_placeholder(flags, NO_OVERSPEND)
}

fn render_goals(s: &Snapshot) -> String {
    let goals = s
        .goals
        .iter()
        .map(|g| {
            format!(
                "{} ({}): {:.2}/{:.2} ({}%)",
                g.goal.name,
                g.goal.priority,
                g.goal.current_amount,
                g.goal.target_amount,
                g.percent_complete
            )
        })
        .collect();
    or_placeholder(goals, NONE)
}

fn render_diary(s: &Snapshot) -> String {
    let entries = s
        .diary
        .iter()
        .take(DIARY_EXCERPTS)
        .map(|d| {
            format!(
                "{}: emotion={} note={}",
                d.date,
                d.emotion.as_deref().unwrap_or("neutral"),
                truncate_chars(&d.body, DIARY_EXCERPT_CHARS)
            )
        })
        .collect();
    or_placeholder(entries, NO_DIARY)
}

fn render_bursaries(s: &Snapshot) -> String {
    let bursaries = s
        .bursaries
        .iter()
        .map(|b| format!("{}: {:.2} next {}", b.provider, b.monthly_amount, b.next_payment_date))
        .collect();
    or_placeholder(bursaries, NONE)
}

fn render_incomes(s: &Snapshot) -> String {
    let incomes = s
        .incomes
        .iter()
        .map(|i| format!("{}: {:.2}", i.source, i.amount))
        .collect();
    or_placeholder(incomes, NONE)
}

fn render_savings(s: &Snapshot) -> String {
    let transfers = s
        .savings
        .iter()
        .map(|t| {
            format!(
                "{:.2} from {} to {}",
                t.amount,
                t.from.as_deref().unwrap_or("account"),
                t.to.as_deref().unwrap_or("savings")
            )
        })
        .collect();
    or_placeholder(transfers, NONE)
}

fn render_trend(s: &Snapshot, today: NaiveDate) -> String {
    if s.transactions.is_empty() {
        return NO_TRANSACTIONS.to_string();
    }
    let (total, count) = s
        .transactions
        .iter()
        .filter(|t| t.resolved_kind() == TransactionKind::Expense)
        .filter(|t| in_trailing_week(t.date, today))
        .fold((0.0, 0usize), |(sum, n), t| (sum + t.amount.abs(), n + 1));
    format!("last7day_spend={:.2} across {} tx", total, count)
}

/// Seven days at the average daily spend since the first recorded expense
fn render_forecast(s: &Snapshot, today: NaiveDate) -> String {
    let expenses: Vec<_> = s
        .transactions
        .iter()
        .filter(|t| t.resolved_kind() == TransactionKind::Expense && t.date <= today)
        .collect();

    let Some(first) = expenses.iter().map(|t| t.date).min() else {
        return INSUFFICIENT_DATA.to_string();
    };

    let days = ((today - first).num_days() + 1).max(1) as f64;
    let total: f64 = expenses.iter().map(|t| t.amount.abs()).sum();
    format!(
        "expected_next_7d_spend ~= {:.2} based on average daily spend.",
        total / days * 7.0
    )
}

fn render_gamification(s: &Snapshot) -> String {
    let g = &s.gamification;
    let badges = if g.badges.is_empty() {
        NONE.to_string()
    } else {
        g.badges.join(", ")
    };
    format!(
        "level={}, xp={}, streak={}, badges={}",
        g.level, g.xp, g.streak, badges
    )
}

/// First `max` characters, on a char boundary
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
