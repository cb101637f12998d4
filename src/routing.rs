//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    account::{get_account_endpoint, open_account_endpoint},
    endpoints,
    ledger::get_account_summary_endpoint,
    transaction::{
        create_transaction_endpoint, decide_transaction_endpoint,
        get_account_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ACCOUNTS, post(open_account_endpoint))
        .route(endpoints::ACCOUNT, get(get_account_endpoint))
        .route(
            endpoints::ACCOUNT_TRANSACTIONS,
            get(get_account_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::ACCOUNT_SUMMARY,
            get(get_account_summary_endpoint),
        )
        .route(
            endpoints::TRANSACTION_DECISION,
            post(decide_transaction_endpoint),
        )
        .with_state(state)
}
