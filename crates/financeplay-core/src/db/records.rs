//! Whole-user loading

use super::Database;
use crate::error::{Error, Result};
use crate::models::UserRecords;

impl Database {
    /// Load every record a user owns
    pub fn load_user_records(&self, user_id: i64) -> Result<UserRecords> {
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

        Ok(UserRecords {
            user: Some(user),
            transactions: self.list_transactions(user_id, None)?,
            incomes: self.list_incomes(user_id)?,
            savings: self.list_savings_transfers(user_id)?,
            goals: self.list_goals(user_id)?,
            bursaries: self.list_bursaries(user_id)?,
            budget_categories: self.list_budget_categories(user_id)?,
            diary: self.list_diary_entries(user_id)?,
            gamification: self.get_gamification(user_id)?,
        })
    }
}
