//! Defines the endpoint for fetching a single savings account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{SavingsAccount, get_account},
    database_id::AccountId,
};

/// The state needed to fetch an account.
#[derive(Debug, Clone)]
pub struct GetAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching a savings account by its ID.
pub async fn get_account_endpoint(
    State(state): State<GetAccountState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<SavingsAccount>, Error> {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Err(Error::DatabaseLockError);
        }
    };

    let account = get_account(account_id, &connection)?;

    Ok(Json(account))
}
