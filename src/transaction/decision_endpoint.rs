//! Defines the endpoint for approving or rejecting a pending transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{SavingsTransaction, TransactionDecision, decide_transaction},
};

/// The state needed to decide a transaction.
#[derive(Debug, Clone)]
pub struct DecideTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DecideTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a decision request.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// The verdict to apply.
    pub decision: TransactionDecision,
    /// Who is making the decision, recorded on the transaction for
    /// attribution.
    pub actor: String,
}

/// A route handler for approving or rejecting a pending transaction.
///
/// Only pending transactions can be decided; a decision on a transaction
/// that is already approved or rejected fails with `409 Conflict` and leaves
/// the stored data untouched.
pub async fn decide_transaction_endpoint(
    State(state): State<DecideTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<SavingsTransaction>, Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    let transaction = decide_transaction(
        transaction_id,
        request.decision,
        &request.actor,
        &connection,
    )?;

    Ok(Json(transaction))
}
