//! Defines the core data model and database queries for savings accounts.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{AccountId, StudentId},
};

// ============================================================================
// MODELS
// ============================================================================

/// A savings account owned by a single student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    /// The ID of the account.
    pub id: AccountId,
    /// The ID of the student (santri) that owns the account.
    pub student_id: StudentId,
    /// The student's display name.
    pub student_name: String,
    /// The stored balance in minor currency units (whole rupiah).
    ///
    /// The service maintains this value when a transaction is approved;
    /// clients never write it directly.
    pub balance: i64,
    /// When the account was opened.
    pub created_at: OffsetDateTime,
}

/// The details needed to open a new savings account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// The ID of the student (santri) that will own the account.
    pub student_id: StudentId,
    /// The student's display name.
    pub student_name: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id INTEGER NOT NULL UNIQUE,
                student_name TEXT NOT NULL,
                balance INTEGER NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [SavingsAccount].
pub fn map_row_to_account(row: &Row) -> Result<SavingsAccount, rusqlite::Error> {
    let id = row.get(0)?;
    let student_id = row.get(1)?;
    let student_name = row.get(2)?;
    let balance = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(SavingsAccount {
        id,
        student_id,
        student_name,
        balance,
        created_at,
    })
}

/// Open a savings account for a student.
///
/// The account starts with a zero balance. Each student can hold at most one
/// account.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateAccount] if the student already has an account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn open_account(
    new_account: &NewAccount,
    connection: &Connection,
) -> Result<SavingsAccount, Error> {
    connection
        .prepare(
            "INSERT INTO account (student_id, student_name, balance, created_at)
             VALUES (?1, ?2, 0, ?3)
             RETURNING id, student_id, student_name, balance, created_at",
        )?
        .query_row(
            params![
                new_account.student_id,
                new_account.student_name,
                OffsetDateTime::now_utc(),
            ],
            map_row_to_account,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccount(new_account.student_id),
            error => error.into(),
        })
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<SavingsAccount, Error> {
    let account = connection
        .prepare(
            "SELECT id, student_id, student_name, balance, created_at FROM account WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

// ============================================================================
// TESTS
// ============================================================================
