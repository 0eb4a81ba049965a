//! Top Spending Insight
//!
//! Points at the category that takes the biggest share of spend.

use crate::models::format_money;

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind};

pub struct TopSpendingRule;

impl InsightRule for TopSpendingRule {
    fn id(&self) -> InsightKind {
        InsightKind::TopSpending
    }

    fn name(&self) -> &'static str {
        "Top Spending"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let (category, amount) = ctx.totals.top_category()?;
        let percent = ctx.totals.percent_of_total(amount);

        Some(
            Insight::new(
                InsightKind::TopSpending,
                format!("{} is your top expense", capitalize(category)),
                format!(
                    "You've spent {} on {} ({}% of total spending). Consider setting a budget limit for this category.",
                    format_money(amount),
                    category,
                    percent
                ),
            )
            .with_action(format!("Set a monthly {} budget", category)),
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
