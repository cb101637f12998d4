//! Defines the core data models and database queries for savings transactions.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    policy::LedgerPolicy,
};

// ============================================================================
// MODELS
// ============================================================================

/// The direction money moves in a savings transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Money paid into the account.
    Income,
    /// Money taken out of the account.
    Expense,
}

impl TransactionDirection {
    /// The text stored in the database for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionDirection::Income => "income",
            TransactionDirection::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle state of a savings transaction.
///
/// Transactions start out pending and are approved or rejected exactly once.
/// The terminal states are never left again, and only approved transactions
/// count towards an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Waiting for an operator's decision.
    Pending,
    /// Confirmed by an operator; contributes to the account balance.
    Approved,
    /// Refused by an operator; never contributes to the account balance.
    Rejected,
}

impl TransactionStatus {
    /// The text stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operator's verdict on a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDecision {
    /// Confirm the transaction and apply it to the account balance.
    Approve,
    /// Refuse the transaction; it will never affect the account balance.
    Reject,
}

impl TransactionDecision {
    /// The terminal status this decision moves a transaction to.
    pub fn target_status(self) -> TransactionStatus {
        match self {
            TransactionDecision::Approve => TransactionStatus::Approved,
            TransactionDecision::Reject => TransactionStatus::Rejected,
        }
    }
}

/// A single deposit or withdrawal recorded against a savings account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsTransaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the transaction belongs to.
    pub account_id: AccountId,
    /// Whether the transaction pays money in or takes money out.
    pub direction: TransactionDirection,
    /// The amount of money moved, in minor currency units (whole rupiah).
    /// Always positive; the direction carries the sign.
    pub amount: i64,
    /// Where the transaction is in its lifecycle.
    pub status: TransactionStatus,
    /// A text description of what the transaction was for.
    pub description: String,
    /// An optional link to proof of the transaction, e.g. a transfer receipt.
    /// Stored and echoed back as-is, never interpreted.
    pub proof_ref: Option<String>,
    /// Who approved or rejected the transaction, once it has been decided.
    pub decided_by: Option<String>,
    /// When the transaction was decided, once it has been decided.
    pub decided_at: Option<OffsetDateTime>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl SavingsTransaction {
    /// The amount with the direction applied: positive for income, negative
    /// for expense.
    pub fn signed_amount(&self) -> i64 {
        match self.direction {
            TransactionDirection::Income => self.amount,
            TransactionDirection::Expense => -self.amount,
        }
    }
}

/// The details needed to record a new savings transaction.
///
/// New transactions always start out pending.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// Whether the transaction pays money in or takes money out.
    pub direction: TransactionDirection,
    /// The amount of money to move, in minor currency units.
    pub amount: i64,
    /// What the money is for.
    pub description: String,
    /// An optional link to proof of the transaction.
    pub proof_ref: Option<String>,
}

impl NewTransaction {
    /// Check the transaction against the ledger policy.
    ///
    /// This runs before the database is touched so that bad input never costs
    /// a write.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::BelowMinimumAmount] if the amount is below the policy minimum,
    /// - or [Error::MissingDescription] if the description is empty after
    ///   trimming whitespace.
    pub fn validate(&self, policy: &LedgerPolicy) -> Result<(), Error> {
        if self.amount < policy.minimum_transaction_amount {
            return Err(Error::BelowMinimumAmount {
                amount: self.amount,
                minimum: policy.minimum_transaction_amount,
            });
        }

        if self.description.trim().is_empty() {
            return Err(Error::MissingDescription);
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Record a new savings transaction against an account.
///
/// The transaction is validated against `policy` before the database is
/// touched, and always starts out pending: it does not move the account
/// balance until an operator approves it.
///
/// # Errors
/// This function will return a:
/// - [Error::BelowMinimumAmount] or [Error::MissingDescription] if validation
///   fails,
/// - [Error::NotFound] if `account_id` does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    account_id: AccountId,
    new_transaction: NewTransaction,
    policy: &LedgerPolicy,
    connection: &Connection,
) -> Result<SavingsTransaction, Error> {
    new_transaction.validate(policy)?;

    connection
        .prepare(
            "INSERT INTO savings_transaction
                (account_id, direction, amount, status, description, proof_ref, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, account_id, direction, amount, status, description, proof_ref,
                       decided_by, decided_at, created_at",
        )?
        .query_row(
            params![
                account_id,
                new_transaction.direction.as_str(),
                new_transaction.amount,
                TransactionStatus::Pending.as_str(),
                new_transaction.description,
                new_transaction.proof_ref,
                OffsetDateTime::now_utc(),
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<SavingsTransaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, account_id, direction, amount, status, description, proof_ref,
                    decided_by, decided_at, created_at
             FROM savings_transaction WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction recorded against an account, newest first.
///
/// All lifecycle states are included; downstream consumers such as the
/// balance computation are responsible for filtering.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<SavingsTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, direction, amount, status, description, proof_ref,
                    decided_by, decided_at, created_at
             FROM savings_transaction
             WHERE account_id = :account_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Apply an operator's decision to a pending transaction.
///
/// The status update and, for approvals, the balance movement happen in a
/// single database transaction, so a decision either lands completely or not
/// at all. The update is guarded on the stored status: whichever decision is
/// written first wins and every later attempt fails.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a real transaction,
/// - [Error::InvalidStateTransition] if the transaction has already been
///   approved or rejected,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn decide_transaction(
    id: TransactionId,
    decision: TransactionDecision,
    actor: &str,
    connection: &Connection,
) -> Result<SavingsTransaction, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let current = get_transaction(id, &sql_transaction)?;

    if current.status != TransactionStatus::Pending {
        return Err(Error::InvalidStateTransition {
            id,
            status: current.status,
        });
    }

    let target_status = decision.target_status();
    let decided_at = OffsetDateTime::now_utc();

    // The stored status is the arbiter; whoever writes first wins.
    let rows_updated = sql_transaction.execute(
        "UPDATE savings_transaction
         SET status = ?1, decided_by = ?2, decided_at = ?3
         WHERE id = ?4 AND status = ?5",
        params![
            target_status.as_str(),
            actor,
            decided_at,
            id,
            TransactionStatus::Pending.as_str(),
        ],
    )?;

    if rows_updated == 0 {
        return Err(Error::InvalidStateTransition {
            id,
            status: current.status,
        });
    }

    if target_status == TransactionStatus::Approved {
        sql_transaction.execute(
            "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
            params![current.signed_amount(), current.account_id],
        )?;
    }

    sql_transaction.commit()?;

    Ok(SavingsTransaction {
        status: target_status,
        decided_by: Some(actor.to_owned()),
        decided_at: Some(decided_at),
        ..current
    })
}

/// Create the savings transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                direction TEXT NOT NULL,
                amount INTEGER NOT NULL,
                status TEXT NOT NULL,
                description TEXT NOT NULL,
                proof_ref TEXT,
                decided_by TEXT,
                decided_at TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used by the transaction list and the balance recomputation.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_savings_transaction_account
         ON savings_transaction(account_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [SavingsTransaction].
pub fn map_transaction_row(row: &Row) -> Result<SavingsTransaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let direction = parse_direction(row, 2)?;
    let amount = row.get(3)?;
    let status = parse_status(row, 4)?;
    let description = row.get(5)?;
    let proof_ref = row.get(6)?;
    let decided_by = row.get(7)?;
    let decided_at = row.get(8)?;
    let created_at = row.get(9)?;

    Ok(SavingsTransaction {
        id,
        account_id,
        direction,
        amount,
        status,
        description,
        proof_ref,
        decided_by,
        decided_at,
        created_at,
    })
}

fn parse_direction(row: &Row, index: usize) -> Result<TransactionDirection, rusqlite::Error> {
    let raw: String = row.get(index)?;

    match raw.as_str() {
        "income" => Ok(TransactionDirection::Income),
        "expense" => Ok(TransactionDirection::Expense),
        _ => Err(rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("unknown transaction direction {raw:?}").into(),
        )),
    }
}

fn parse_status(row: &Row, index: usize) -> Result<TransactionStatus, rusqlite::Error> {
    let raw: String = row.get(index)?;

    match raw.as_str() {
        "pending" => Ok(TransactionStatus::Pending),
        "approved" => Ok(TransactionStatus::Approved),
        "rejected" => Ok(TransactionStatus::Rejected),
        _ => Err(rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("unknown transaction status {raw:?}").into(),
        )),
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{NewAccount, SavingsAccount, get_account, open_account},
        db::initialize,
        policy::LedgerPolicy,
    };

    use super::{
        NewTransaction, TransactionDecision, TransactionDirection, TransactionStatus,
        create_transaction, decide_transaction, get_account_transactions, get_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_test_account(conn: &Connection) -> SavingsAccount {
        open_account(
            &NewAccount {
                student_id: 1,
                student_name: "Ahmad Fauzi".to_owned(),
            },
            conn,
        )
        .expect("could not open account")
    }

    fn deposit(amount: i64) -> NewTransaction {
        NewTransaction {
            direction: TransactionDirection::Income,
            amount,
            description: "Transfer from parents".to_owned(),
            proof_ref: None,
        }
    }

    fn withdrawal(amount: i64) -> NewTransaction {
        NewTransaction {
            direction: TransactionDirection::Expense,
            amount,
            description: "School supplies".to_owned(),
            proof_ref: None,
        }
    }

    #[test]
    fn create_starts_pending_and_leaves_balance_unchanged() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);

        let transaction =
            create_transaction(account.id, deposit(50_000), &LedgerPolicy::default(), &conn)
                .expect("could not create transaction");

        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(transaction.amount, 50_000);
        assert_eq!(transaction.decided_by, None);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 0);
    }

    #[test]
    fn create_fails_below_minimum_amount() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);

        let result = create_transaction(account.id, deposit(500), &LedgerPolicy::default(), &conn);

        assert_eq!(
            result,
            Err(Error::BelowMinimumAmount {
                amount: 500,
                minimum: 1000
            })
        );
    }

    #[test]
    fn create_fails_on_unknown_account() {
        let conn = get_test_connection();

        let result = create_transaction(42, deposit(50_000), &LedgerPolicy::default(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn approve_moves_balance_and_records_actor() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);
        let transaction =
            create_transaction(account.id, deposit(50_000), &LedgerPolicy::default(), &conn)
                .unwrap();

        let decided = decide_transaction(
            transaction.id,
            TransactionDecision::Approve,
            "ustadz-budi",
            &conn,
        )
        .expect("could not approve transaction");

        assert_eq!(decided.status, TransactionStatus::Approved);
        assert_eq!(decided.decided_by.as_deref(), Some("ustadz-budi"));
        assert!(decided.decided_at.is_some());
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 50_000);

        // The returned record matches what is stored.
        assert_eq!(decided, get_transaction(transaction.id, &conn).unwrap());
    }

    #[test]
    fn approved_expense_subtracts_from_balance() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);
        let transaction = create_transaction(
            account.id,
            withdrawal(20_000),
            &LedgerPolicy::default(),
            &conn,
        )
        .unwrap();

        decide_transaction(
            transaction.id,
            TransactionDecision::Approve,
            "ustadz-budi",
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(account.id, &conn).unwrap().balance, -20_000);
    }

    #[test]
    fn reject_leaves_balance_unchanged() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);
        let transaction =
            create_transaction(account.id, deposit(50_000), &LedgerPolicy::default(), &conn)
                .unwrap();

        let decided = decide_transaction(
            transaction.id,
            TransactionDecision::Reject,
            "ustadz-budi",
            &conn,
        )
        .expect("could not reject transaction");

        assert_eq!(decided.status, TransactionStatus::Rejected);
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 0);
    }

    #[test]
    fn second_decision_fails_once_terminal() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);
        let transaction =
            create_transaction(account.id, deposit(50_000), &LedgerPolicy::default(), &conn)
                .unwrap();
        decide_transaction(
            transaction.id,
            TransactionDecision::Approve,
            "ustadz-budi",
            &conn,
        )
        .unwrap();

        let second_approve = decide_transaction(
            transaction.id,
            TransactionDecision::Approve,
            "ustadz-rahmat",
            &conn,
        );
        let late_reject = decide_transaction(
            transaction.id,
            TransactionDecision::Reject,
            "ustadz-rahmat",
            &conn,
        );

        let want = Err(Error::InvalidStateTransition {
            id: transaction.id,
            status: TransactionStatus::Approved,
        });
        assert_eq!(second_approve, want);
        assert_eq!(late_reject, want);

        // The losing decisions must not have moved the balance again.
        assert_eq!(get_account(account.id, &conn).unwrap().balance, 50_000);
    }

    #[test]
    fn decide_fails_on_unknown_transaction() {
        let conn = get_test_connection();

        let result = decide_transaction(1337, TransactionDecision::Approve, "ustadz-budi", &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_returns_all_statuses_newest_first() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);
        let policy = LedgerPolicy::default();

        let first = create_transaction(account.id, deposit(50_000), &policy, &conn).unwrap();
        let second = create_transaction(account.id, withdrawal(20_000), &policy, &conn).unwrap();
        let third = create_transaction(account.id, deposit(10_000), &policy, &conn).unwrap();
        decide_transaction(first.id, TransactionDecision::Approve, "ustadz-budi", &conn).unwrap();
        decide_transaction(second.id, TransactionDecision::Reject, "ustadz-budi", &conn).unwrap();

        let transactions = get_account_transactions(account.id, &conn).unwrap();

        let got_ids: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(got_ids, vec![third.id, second.id, first.id]);

        let got_statuses: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.status)
            .collect();
        assert_eq!(
            got_statuses,
            vec![
                TransactionStatus::Pending,
                TransactionStatus::Rejected,
                TransactionStatus::Approved,
            ]
        );
    }

    #[test]
    fn list_is_empty_for_account_with_no_transactions() {
        let conn = get_test_connection();
        let account = insert_test_account(&conn);

        let transactions = get_account_transactions(account.id, &conn).unwrap();

        assert_eq!(transactions, vec![]);
    }
}
