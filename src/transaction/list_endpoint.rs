//! Defines the endpoint for listing an account's transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_account,
    database_id::AccountId,
    transaction::{SavingsTransaction, get_account_transactions},
};

/// The state needed to list an account's transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing every transaction of an account, newest first.
///
/// All lifecycle states are included, without any filtering; the balance
/// recomputation downstream decides what counts.
pub async fn get_account_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Vec<SavingsTransaction>>, Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    // An unknown account should read as 404, not as an empty list.
    get_account(account_id, &connection)?;

    let transactions = get_account_transactions(account_id, &connection)?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{NewAccount, open_account},
        database_id::AccountId,
        db::initialize,
        policy::LedgerPolicy,
        transaction::{
            NewTransaction, TransactionDecision, TransactionDirection, TransactionStatus,
            create_transaction, decide_transaction,
        },
    };

    use super::{ListTransactionsState, get_account_transactions_endpoint};

    fn get_test_state_and_account() -> (ListTransactionsState, AccountId) {
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

        let state = ListTransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, account.id)
    }

    #[tokio::test]
    async fn includes_every_lifecycle_state() {
        let (state, account_id) = get_test_state_and_account();
        {
            let connection = state.db_connection.lock().unwrap();
            let policy = LedgerPolicy::default();
            let approved = create_transaction(
                account_id,
                NewTransaction {
                    direction: TransactionDirection::Income,
                    amount: 50_000,
                    description: "Transfer from parents".to_owned(),
                    proof_ref: None,
                },
                &policy,
                &connection,
            )
            .unwrap();
            decide_transaction(
                approved.id,
                TransactionDecision::Approve,
                "ustadz-budi",
                &connection,
            )
            .unwrap();
            create_transaction(
                account_id,
                NewTransaction {
                    direction: TransactionDirection::Expense,
                    amount: 10_000,
                    description: "School supplies".to_owned(),
                    proof_ref: None,
                },
                &policy,
                &connection,
            )
            .unwrap();
        }

        let Json(transactions) = get_account_transactions_endpoint(State(state), Path(account_id))
            .await
            .expect("expected the transactions to be listed");

        let got_statuses: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.status)
            .collect();
        assert_eq!(
            got_statuses,
            vec![TransactionStatus::Pending, TransactionStatus::Approved]
        );
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let (state, _) = get_test_state_and_account();

        let result = get_account_transactions_endpoint(State(state), Path(42)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
