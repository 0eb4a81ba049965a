//! Gamification state operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::{GamificationState, Persona, DEFAULT_DAILY_CHALLENGE};

impl Database {
    /// Stored state, or the new-user default when none exists yet
    pub fn get_gamification(&self, user_id: i64) -> Result<GamificationState> {
        let conn = self.conn()?;
        let state = conn
            .query_row(
                "SELECT xp, persona, daily_challenge FROM gamification WHERE user_id = ?",
                params![user_id],
                |row| {
                    let persona: String = row.get(1)?;
                    Ok(GamificationState {
                        xp: row.get(0)?,
                        persona: persona.parse().unwrap_or_default(),
                        daily_challenge: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(state.unwrap_or_default())
    }

    /// Add XP and return the new total; negative awards are ignored
    pub fn award_xp(&self, user_id: i64, amount: i64) -> Result<i64> {
        let amount = amount.max(0);
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO gamification (user_id, xp, daily_challenge)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                xp = gamification.xp + excluded.xp,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, amount, DEFAULT_DAILY_CHALLENGE],
        )?;
        let xp: i64 = conn.query_row(
            "SELECT xp FROM gamification WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        debug!(user_id, awarded = amount, xp, "XP awarded");
        Ok(xp)
    }

    pub fn set_persona(&self, user_id: i64, persona: Persona) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO gamification (user_id, persona, daily_challenge)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                persona = excluded.persona,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, persona.as_str(), DEFAULT_DAILY_CHALLENGE],
        )?;
        Ok(())
    }
}
