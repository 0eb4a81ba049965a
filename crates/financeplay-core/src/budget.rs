//! Budget envelope checks

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{finite_or_zero, BudgetCategory};

/// Fraction of a limit at which a category is flagged
pub const OVERSPEND_THRESHOLD: f64 = 0.8;

/// A category at or near its envelope limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverspendFlag {
    pub category: String,
    pub spent: f64,
    pub limit: f64,
    /// Whole percent of the limit used
    pub percent_used: u32,
    /// Spend is strictly above the limit
    pub exceeded: bool,
}

/// Compare spending against envelopes.
///
/// Envelope names match spending categories ignoring case; if several
/// categories differ only by case their spend is combined. Envelopes without
/// a positive limit are skipped. Flags come back in envelope order.
pub fn overspent(
    spending_totals: &BTreeMap<String, f64>,
    envelopes: &[BudgetCategory],
) -> Vec<OverspendFlag> {
    envelopes
        .iter()
        .filter_map(|envelope| {
            let limit = finite_or_zero(envelope.limit?);
            if limit <= 0.0 {
                return None;
            }

            let spent: f64 = spending_totals
                .iter()
                .filter(|(name, _)| name.eq_ignore_ascii_case(&envelope.name))
                .map(|(_, amount)| *amount)
                .sum();

            if spent < OVERSPEND_THRESHOLD * limit {
                return None;
            }

            Some(OverspendFlag {
                category: envelope.name.clone(),
                spent,
                limit,
                percent_used: (spent / limit * 100.0).round() as u32,
                exceeded: spent > limit,
            })
        })
        .collect()
}
