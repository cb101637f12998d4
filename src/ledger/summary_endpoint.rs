//! Defines the endpoint for an account's reconciliation summary.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    account::{SavingsAccount, get_account},
    database_id::AccountId,
    ledger::{BalanceTotals, Reconciliation, compute_balance, reconcile},
    transaction::{TransactionStatus, get_account_transactions},
};

/// The state needed to build an account summary.
#[derive(Debug, Clone)]
pub struct AccountSummaryState {
    /// The database connection for managing accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The reconciliation report for a single account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    /// The account record, including the stored balance.
    pub account: SavingsAccount,
    /// Totals recomputed from the approved transaction history.
    pub totals: BalanceTotals,
    /// The stored balance and recomputed balance side by side.
    pub reconciliation: Reconciliation,
    /// How many transactions are still waiting for a decision.
    pub pending_count: usize,
}

/// A route handler for the reconciliation summary of an account.
///
/// The balance is recomputed from a fresh read of the transaction history on
/// every request. A mismatch between the stored and recomputed balance is
/// reported in the payload, never raised as an error.
pub async fn get_account_summary_endpoint(
    State(state): State<AccountSummaryState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<AccountSummary>, Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    let account = get_account(account_id, &connection)?;
    let transactions = get_account_transactions(account_id, &connection)?;

    let totals = compute_balance(&transactions);
    let reconciliation = reconcile(account.balance, totals.net_balance);
    let pending_count = transactions
        .iter()
        .filter(|transaction| transaction.status == TransactionStatus::Pending)
        .count();

    Ok(Json(AccountSummary {
        account,
        totals,
        reconciliation,
        pending_count,
    }))
}
