//! Budget envelope and bursary operations

use rusqlite::params;

use super::{date_column, format_date, Database};
use crate::error::{Error, Result};
use crate::models::{finite_or_zero, BudgetCategory, BudgetCategoryInput, Bursary, NewBursary};

impl Database {
    /// Create or update envelopes by name (case-insensitive)
    ///
    /// Returns the user's full envelope list afterwards.
    pub fn upsert_budget_categories(
        &self,
        user_id: i64,
        inputs: &[BudgetCategoryInput],
    ) -> Result<Vec<BudgetCategory>> {
        if inputs.iter().any(|c| c.name.trim().is_empty()) {
            return Err(Error::InvalidData("Budget category name is required".into()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for input in inputs {
            tx.execute(
                r#"
                INSERT INTO budget_categories (user_id, name, limit_amount, icon)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (user_id, name) DO UPDATE SET
                    limit_amount = excluded.limit_amount,
                    icon = COALESCE(excluded.icon, budget_categories.icon)
                "#,
                params![
                    user_id,
                    input.name.trim(),
                    input.limit.map(finite_or_zero),
                    input.icon,
                ],
            )?;
        }
        tx.commit()?;
        drop(conn);

        self.list_budget_categories(user_id)
    }

    pub fn list_budget_categories(&self, user_id: i64) -> Result<Vec<BudgetCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, limit_amount, icon
            FROM budget_categories WHERE user_id = ?
            ORDER BY name COLLATE NOCASE
            "#,
        )?;
        let categories = stmt
            .query_map(params![user_id], |row| {
                Ok(BudgetCategory {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    limit: row.get(3)?,
                    icon: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn insert_bursary(&self, user_id: i64, input: &NewBursary) -> Result<Bursary> {
        let provider = input.provider.trim();
        if provider.is_empty() {
            return Err(Error::InvalidData("Bursary provider is required".into()));
        }

        let bursary = Bursary {
            id: 0,
            user_id,
            provider: provider.to_string(),
            monthly_amount: finite_or_zero(input.monthly_amount),
            next_payment_date: input.next_payment_date,
            notes: input.notes.clone(),
        };

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO bursaries (user_id, provider, monthly_amount, next_payment_date, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                bursary.user_id,
                bursary.provider,
                bursary.monthly_amount,
                format_date(bursary.next_payment_date),
                bursary.notes,
            ],
        )?;

        Ok(Bursary {
            id: conn.last_insert_rowid(),
            ..bursary
        })
    }

    /// List bursaries by next payment date, soonest first
    pub fn list_bursaries(&self, user_id: i64) -> Result<Vec<Bursary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, provider, monthly_amount, next_payment_date, notes
            FROM bursaries WHERE user_id = ?
            ORDER BY next_payment_date ASC, id ASC
            "#,
        )?;
        let bursaries = stmt
            .query_map(params![user_id], |row| {
                Ok(Bursary {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    provider: row.get(2)?,
                    monthly_amount: row.get(3)?,
                    next_payment_date: date_column(row, 4)?,
                    notes: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bursaries)
    }
}
