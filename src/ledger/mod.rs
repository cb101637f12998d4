//! The savings ledger: balance derivation and reconciliation.

mod core;
mod summary_endpoint;

pub use core::{BalanceTotals, Reconciliation, compute_balance, reconcile};
pub use summary_endpoint::{AccountSummary, get_account_summary_endpoint};
