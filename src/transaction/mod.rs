//! Savings transaction management.
//!
//! This module contains everything related to savings transactions:
//! - The `SavingsTransaction` model and its lifecycle enums
//! - Database functions for recording, querying, and deciding transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod decision_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, SavingsTransaction, TransactionDecision, TransactionDirection,
    TransactionStatus, create_transaction, create_transaction_table, decide_transaction,
    get_account_transactions, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use decision_endpoint::decide_transaction_endpoint;
pub use list_endpoint::get_account_transactions_endpoint;
