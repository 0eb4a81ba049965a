//! Per-user ledger state
//!
//! A [`Ledger`] holds one user's records. It is never mutated in place:
//! [`Ledger::apply`] returns a new ledger with the action folded in, so a
//! reader holding the old value keeps a consistent view.

use chrono::NaiveDate;

use crate::models::{
    BudgetCategory, Bursary, DiaryEntry, Goal, Income, Persona, SavingsTransfer, Transaction,
    UserRecords,
};
use crate::snapshot::{Dashboard, Snapshot};

/// A change to a user's records
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    /// Replace everything with freshly loaded records
    Load(UserRecords),
    TransactionAdded(Transaction),
    IncomeAdded(Income),
    SavingsAdded(SavingsTransfer),
    GoalAdded(Goal),
    GoalProgressUpdated { goal_id: i64, current_amount: f64 },
    GoalRemoved { goal_id: i64 },
    DiaryEntryAdded(DiaryEntry),
    /// Envelopes keyed by name, ignoring case
    BudgetCategoriesUpserted(Vec<BudgetCategory>),
    BursaryAdded(Bursary),
    XpAwarded(i64),
    PersonaChanged(Persona),
}

impl LedgerAction {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::TransactionAdded(_) => "transaction_added",
            Self::IncomeAdded(_) => "income_added",
            Self::SavingsAdded(_) => "savings_added",
            Self::GoalAdded(_) => "goal_added",
            Self::GoalProgressUpdated { .. } => "goal_progress_updated",
            Self::GoalRemoved { .. } => "goal_removed",
            Self::DiaryEntryAdded(_) => "diary_entry_added",
            Self::BudgetCategoriesUpserted(_) => "budget_categories_upserted",
            Self::BursaryAdded(_) => "bursary_added",
            Self::XpAwarded(_) => "xp_awarded",
            Self::PersonaChanged(_) => "persona_changed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: UserRecords,
}

impl Ledger {
    pub fn new(records: UserRecords) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &UserRecords {
        &self.records
    }

    /// Fold an action into a copy of this ledger
    pub fn apply(&self, action: LedgerAction) -> Self {
        tracing::trace!(action = action.name(), "Applying ledger action");

        let mut records = self.records.clone();
        match action {
            LedgerAction::Load(loaded) => records = loaded,
            LedgerAction::TransactionAdded(tx) => records.transactions.push(tx),
            LedgerAction::IncomeAdded(income) => records.incomes.push(income),
            LedgerAction::SavingsAdded(transfer) => records.savings.push(transfer),
            LedgerAction::GoalAdded(goal) => records.goals.push(goal),
            LedgerAction::GoalProgressUpdated {
                goal_id,
                current_amount,
            } => {
                if let Some(goal) = records.goals.iter_mut().find(|g| g.id == goal_id) {
                    goal.current_amount = current_amount;
                }
            }
            LedgerAction::GoalRemoved { goal_id } => records.goals.retain(|g| g.id != goal_id),
            LedgerAction::DiaryEntryAdded(entry) => records.diary.push(entry),
            LedgerAction::BudgetCategoriesUpserted(envelopes) => {
                for envelope in envelopes {
                    match records
                        .budget_categories
                        .iter_mut()
                        .find(|c| c.name.eq_ignore_ascii_case(&envelope.name))
                    {
                        Some(existing) => *existing = envelope,
                        None => records.budget_categories.push(envelope),
                    }
                }
            }
            LedgerAction::BursaryAdded(bursary) => records.bursaries.push(bursary),
            LedgerAction::XpAwarded(xp) => records.gamification.xp += xp,
            LedgerAction::PersonaChanged(persona) => records.gamification.persona = persona,
        }

        Self { records }
    }

    /// Apply several actions in order
    pub fn apply_all<I>(&self, actions: I) -> Self
    where
        I: IntoIterator<Item = LedgerAction>,
    {
        actions
            .into_iter()
            .fold(self.clone(), |ledger, action| ledger.apply(action))
    }

    pub fn goal(&self, goal_id: i64) -> Option<&Goal> {
        self.records.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn snapshot(&self, today: NaiveDate) -> Snapshot {
        Snapshot::build(&self.records, today)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        Dashboard::build(&self.records, today)
    }
}
