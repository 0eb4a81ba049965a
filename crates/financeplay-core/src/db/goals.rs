//! Goal operations

use rusqlite::{params, OptionalExtension};

use super::{format_date, optional_date_column, Database};
use crate::error::{Error, Result};
use crate::models::{finite_or_zero, Goal, NewGoal, Priority};

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, deadline, priority";

fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    let priority: String = row.get(6)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: optional_date_column(row, 5)?,
        priority: Priority::parse_lenient(&priority),
    })
}

impl Database {
    pub fn insert_goal(&self, user_id: i64, input: &NewGoal) -> Result<Goal> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Goal name is required".into()));
        }
        let target_amount = finite_or_zero(input.target_amount);
        if target_amount <= 0.0 {
            return Err(Error::InvalidData("Goal target must be positive".into()));
        }
        let current_amount = finite_or_zero(input.current_amount);
        if current_amount < 0.0 {
            return Err(Error::InvalidData("Goal progress cannot be negative".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, name, target_amount, current_amount, deadline, priority)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                name,
                target_amount,
                current_amount,
                input.deadline.map(format_date),
                input.priority.as_str(),
            ],
        )?;

        Ok(Goal {
            id: conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            target_amount,
            current_amount,
            deadline: input.deadline,
            priority: input.priority,
        })
    }

    /// List a user's goals in creation order
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY id",
            GOAL_COLUMNS
        ))?;
        let goals = stmt
            .query_map(params![user_id], row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    pub fn get_goal(&self, user_id: i64, goal_id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!(
                    "SELECT {} FROM goals WHERE id = ? AND user_id = ?",
                    GOAL_COLUMNS
                ),
                params![goal_id, user_id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Set a goal's saved amount; the amount is not capped at the target
    pub fn update_goal_progress(
        &self,
        user_id: i64,
        goal_id: i64,
        current_amount: f64,
    ) -> Result<Goal> {
        let current_amount = finite_or_zero(current_amount);
        if current_amount < 0.0 {
            return Err(Error::InvalidData("Goal progress cannot be negative".into()));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE goals SET current_amount = ? WHERE id = ? AND user_id = ?",
            params![current_amount, goal_id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {}", goal_id)));
        }

        self.get_goal(user_id, goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))
    }

    pub fn delete_goal(&self, user_id: i64, goal_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![goal_id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Goal {}", goal_id)));
        }
        Ok(())
    }
}
