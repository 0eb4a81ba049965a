//! Diary operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{date_column, format_date, Database};
use crate::error::{Error, Result};
use crate::models::{DiaryEntry, NewDiaryEntry};

impl Database {
    pub fn insert_diary_entry(
        &self,
        user_id: i64,
        input: &NewDiaryEntry,
        today: NaiveDate,
    ) -> Result<DiaryEntry> {
        let body = input.body.trim();
        if body.is_empty() {
            return Err(Error::InvalidData("Diary entry body is required".into()));
        }

        let entry = DiaryEntry {
            id: 0,
            user_id,
            title: input.title.clone().filter(|t| !t.trim().is_empty()),
            body: body.to_string(),
            emotion: input.emotion.clone().filter(|e| !e.trim().is_empty()),
            date: input.date.unwrap_or(today),
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO diary_entries (user_id, title, body, emotion, date) VALUES (?, ?, ?, ?, ?)",
            params![
                entry.user_id,
                entry.title,
                entry.body,
                entry.emotion,
                format_date(entry.date),
            ],
        )?;

        Ok(DiaryEntry {
            id: conn.last_insert_rowid(),
            ..entry
        })
    }

    /// List diary entries, newest first
    pub fn list_diary_entries(&self, user_id: i64) -> Result<Vec<DiaryEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, body, emotion, date
            FROM diary_entries WHERE user_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;
        let entries = stmt
            .query_map(params![user_id], |row| {
                Ok(DiaryEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    body: row.get(3)?,
                    emotion: row.get(4)?,
                    date: date_column(row, 5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
