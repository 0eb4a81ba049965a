//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create a user; emails are unique ignoring case
    pub fn create_user(&self, email: &str, name: Option<&str>) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::InvalidData(format!("Invalid email: {:?}", email)));
        }
        if self.get_user_by_email(email)?.is_some() {
            return Err(Error::Conflict(format!("User {} already exists", email)));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (email, name) VALUES (?, ?)",
            params![email, name.map(str::trim).filter(|n| !n.is_empty())],
        )?;
        let id = conn.last_insert_rowid();

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE email = ?",
                params![email.trim()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, email, name, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Get the user for `email`, creating it when missing
    pub fn get_or_create_user(&self, email: &str, name: Option<&str>) -> Result<User> {
        match self.get_user_by_email(email)? {
            Some(user) => Ok(user),
            // A concurrent caller may have created it first
            None => match self.create_user(email, name) {
                Ok(user) => Ok(user),
                Err(err) => self.get_user_by_email(email)?.ok_or(err),
            },
        }
    }
}
