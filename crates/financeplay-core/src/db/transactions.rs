//! Transaction, income and savings ledger operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{date_column, format_date, Database};
use crate::error::{Error, Result};
use crate::models::{
    finite_or_zero, Income, NewIncome, NewSavingsTransfer, NewTransaction, SavingsTransfer,
    Transaction, TransactionKind,
};

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let kind: Option<String> = row.get(4)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        kind: kind.and_then(|k| k.parse::<TransactionKind>().ok()),
        description: row.get(5)?,
        date: date_column(row, 6)?,
        account_id: row.get(7)?,
    })
}

impl Database {
    /// Insert a transaction; a missing date means `today`
    pub fn insert_transaction(
        &self,
        user_id: i64,
        input: &NewTransaction,
        today: NaiveDate,
    ) -> Result<Transaction> {
        let category = input.category.trim();
        if category.is_empty() {
            return Err(Error::InvalidData("Transaction category is required".into()));
        }

        let tx = Transaction {
            id: 0,
            user_id,
            amount: finite_or_zero(input.amount),
            category: category.to_string(),
            kind: input.kind,
            description: input.description.trim().to_string(),
            date: input.date.unwrap_or(today),
            account_id: input.account_id.clone(),
        };

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, category, kind, description, date, account_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.user_id,
                tx.amount,
                tx.category,
                tx.kind.map(|k| k.as_str()),
                tx.description,
                format_date(tx.date),
                tx.account_id,
            ],
        )?;

        Ok(Transaction {
            id: conn.last_insert_rowid(),
            ..tx
        })
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, amount, category, kind, description, date, account_id
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )?;
        let transactions = stmt
            .query_map(params![user_id, limit.unwrap_or(-1)], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    pub fn insert_income(&self, user_id: i64, input: &NewIncome, today: NaiveDate) -> Result<Income> {
        let source = input.source.trim();
        if source.is_empty() {
            return Err(Error::InvalidData("Income source is required".into()));
        }

        let income = Income {
            id: 0,
            user_id,
            source: source.to_string(),
            amount: finite_or_zero(input.amount),
            date: input.date.unwrap_or(today),
            note: input.note.clone(),
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO incomes (user_id, source, amount, date, note) VALUES (?, ?, ?, ?, ?)",
            params![
                income.user_id,
                income.source,
                income.amount,
                format_date(income.date),
                income.note,
            ],
        )?;

        Ok(Income {
            id: conn.last_insert_rowid(),
            ..income
        })
    }

    pub fn list_incomes(&self, user_id: i64) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, source, amount, date, note
            FROM incomes WHERE user_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;
        let incomes = stmt
            .query_map(params![user_id], |row| {
                Ok(Income {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    source: row.get(2)?,
                    amount: row.get(3)?,
                    date: date_column(row, 4)?,
                    note: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(incomes)
    }

    /// Record a savings transfer; amounts must be positive
    pub fn insert_savings_transfer(
        &self,
        user_id: i64,
        input: &NewSavingsTransfer,
        today: NaiveDate,
    ) -> Result<SavingsTransfer> {
        let amount = finite_or_zero(input.amount);
        if amount <= 0.0 {
            return Err(Error::InvalidData("Savings amount must be positive".into()));
        }

        let transfer = SavingsTransfer {
            id: 0,
            user_id,
            amount,
            from: input.from.clone(),
            to: input.to.clone(),
            date: input.date.unwrap_or(today),
        };

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO savings_transfers (user_id, amount, from_account, to_account, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                transfer.user_id,
                transfer.amount,
                transfer.from,
                transfer.to,
                format_date(transfer.date),
            ],
        )?;

        Ok(SavingsTransfer {
            id: conn.last_insert_rowid(),
            ..transfer
        })
    }

    pub fn list_savings_transfers(&self, user_id: i64) -> Result<Vec<SavingsTransfer>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, amount, from_account, to_account, date
            FROM savings_transfers WHERE user_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;
        let transfers = stmt
            .query_map(params![user_id], |row| {
                Ok(SavingsTransfer {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    amount: row.get(2)?,
                    from: row.get(3)?,
                    to: row.get(4)?,
                    date: date_column(row, 5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transfers)
    }
}
