//! Tabungan is a web service for managing student (santri) savings accounts
//! at a boarding school.
//!
//! This library provides a JSON REST API over a SQLite ledger. Deposits and
//! withdrawals are recorded as pending transactions that an operator must
//! approve or reject before any money moves; approved transactions feed both
//! the stored account balance and an independently recomputed balance that is
//! reported side by side for reconciliation.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod ledger;
mod policy;
mod routing;
mod transaction;

pub use account::{NewAccount, SavingsAccount, get_account, open_account};
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use ledger::{BalanceTotals, Reconciliation, compute_balance, reconcile};
pub use policy::LedgerPolicy;
pub use routing::build_router;
pub use transaction::{
    NewTransaction, SavingsTransaction, TransactionDecision, TransactionDirection,
    TransactionStatus, create_transaction, decide_transaction, get_account_transactions,
};

use crate::database_id::{StudentId, TransactionId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A decision was attempted on a transaction that has already been
    /// approved or rejected.
    ///
    /// The stored state is authoritative: the caller should re-fetch the
    /// transaction and show its current state rather than retrying.
    #[error("transaction {id} is already {status}; only pending transactions can be decided")]
    InvalidStateTransition {
        /// The ID of the transaction the decision was attempted on.
        id: TransactionId,
        /// The terminal state the transaction is already in.
        status: TransactionStatus,
    },

    /// A new transaction was below the minimum amount accepted by the ledger
    /// policy.
    ///
    /// This is caught before the database is touched.
    #[error("the amount {amount} is below the minimum transaction amount of {minimum}")]
    BelowMinimumAmount {
        /// The amount that was submitted, in minor currency units.
        amount: i64,
        /// The policy minimum in force, in minor currency units.
        minimum: i64,
    },

    /// A new transaction had a description that was empty after trimming
    /// whitespace.
    #[error("a transaction description must not be empty")]
    MissingDescription,

    /// Tried to open a second savings account for a student that already has
    /// one.
    #[error("student {0} already has a savings account")]
    DuplicateAccount(StudentId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::InvalidStateTransition { .. } | Error::DuplicateAccount(_) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            Error::BelowMinimumAmount { .. } | Error::MissingDescription => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
