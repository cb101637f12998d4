//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, policy::LedgerPolicy};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The policy that controls what the savings ledger accepts.
    pub ledger_policy: LedgerPolicy,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, ledger_policy: LedgerPolicy) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            ledger_policy,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
