//! Defines the endpoint for opening a new savings account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{NewAccount, SavingsAccount, open_account},
};

/// The state needed to open an account.
#[derive(Debug, Clone)]
pub struct OpenAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for OpenAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for opening a new savings account for a student.
///
/// Returns the created account as JSON with status `201 Created`.
pub async fn open_account_endpoint(
    State(state): State<OpenAccountState>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<SavingsAccount>), Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    let account = open_account(&new_account, &connection)?;

    Ok((StatusCode::CREATED, Json(account)))
}
