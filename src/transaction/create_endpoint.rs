//! Defines the endpoint for recording a new savings transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::AccountId,
    policy::LedgerPolicy,
    transaction::{NewTransaction, SavingsTransaction, create_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The policy that controls what the savings ledger accepts.
    pub ledger_policy: LedgerPolicy,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger_policy: state.ledger_policy.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording a new savings transaction against an account.
///
/// The transaction starts out pending and does not move the account balance
/// until an operator approves it. Returns the created transaction as JSON
/// with status `201 Created`.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Path(account_id): Path<AccountId>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<SavingsTransaction>), Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    let transaction = create_transaction(
        account_id,
        new_transaction,
        &state.ledger_policy,
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{NewAccount, open_account},
        database_id::AccountId,
        db::initialize,
        policy::LedgerPolicy,
        transaction::{NewTransaction, TransactionDirection, TransactionStatus},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state_and_account() -> (CreateTransactionState, AccountId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = open_account(
            &NewAccount {
                student_id: 1,
                student_name: "Ahmad Fauzi".to_owned(),
            },
            &conn,
        )
        .unwrap();

        let state = CreateTransactionState {
            ledger_policy: LedgerPolicy::default(),
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, account.id)
    }

    #[tokio::test]
    async fn creates_pending_transaction() {
        let (state, account_id) = get_test_state_and_account();

        let (status, Json(transaction)) = create_transaction_endpoint(
            State(state),
            Path(account_id),
            Json(NewTransaction {
                direction: TransactionDirection::Income,
                amount: 25_000,
                description: "Pocket money".to_owned(),
                proof_ref: Some("https://example.com/receipts/123.jpg".to_owned()),
            }),
        )
        .await
        .expect("expected the transaction to be created");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(transaction.account_id, account_id);
        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(
            transaction.proof_ref.as_deref(),
            Some("https://example.com/receipts/123.jpg")
        );
    }

    #[tokio::test]
    async fn amount_below_minimum_is_rejected_before_any_write() {
        let (state, account_id) = get_test_state_and_account();

        let result = create_transaction_endpoint(
            State(state.clone()),
            Path(account_id),
            Json(NewTransaction {
                direction: TransactionDirection::Income,
                amount: 500,
                description: "too small".to_owned(),
                proof_ref: None,
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::BelowMinimumAmount {
                amount: 500,
                minimum: 1000
            })
        );

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(id) FROM savings_transaction", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let (state, _) = get_test_state_and_account();

        let result = create_transaction_endpoint(
            State(state),
            Path(42),
            Json(NewTransaction {
                direction: TransactionDirection::Expense,
                amount: 5000,
                description: "School supplies".to_owned(),
                proof_ref: None,
            }),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
