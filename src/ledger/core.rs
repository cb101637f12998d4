//! The balance engine for savings accounts.
//!
//! Derives account totals from the transaction history and reconciles them
//! against the stored balance. Everything here is pure: the functions take
//! transaction lists as read-only input and never touch the database or the
//! network, so the same input always produces the same output.

use serde::Serialize;

use crate::transaction::{SavingsTransaction, TransactionDirection, TransactionStatus};

/// Account totals derived from approved transactions only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceTotals {
    /// The sum of all approved income amounts, in minor currency units.
    pub total_income: i64,
    /// The sum of all approved expense amounts, in minor currency units.
    pub total_expense: i64,
    /// `total_income - total_expense`.
    ///
    /// Not clamped: a negative value is reported as-is so that discrepancies
    /// surface instead of staying hidden.
    pub net_balance: i64,
}

/// Derive account totals from `transactions`.
///
/// Only approved transactions count; pending and rejected entries never
/// contribute, not even partially. The caller is responsible for passing the
/// transactions of a single account; no account filtering happens here.
pub fn compute_balance(transactions: &[SavingsTransaction]) -> BalanceTotals {
    let mut totals = BalanceTotals::default();

    for transaction in transactions {
        if transaction.status != TransactionStatus::Approved {
            continue;
        }

        match transaction.direction {
            TransactionDirection::Income => totals.total_income += transaction.amount,
            TransactionDirection::Expense => totals.total_expense += transaction.amount,
        }
    }

    totals.net_balance = totals.total_income - totals.total_expense;

    totals
}

/// The stored balance and the recomputed balance side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// The balance as stored on the account record.
    pub server_balance: i64,
    /// The balance recomputed from approved transactions.
    pub computed_net_balance: i64,
    /// Whether the two balances are exactly equal.
    pub matches: bool,
}

/// Compare the stored account balance with a recomputed net balance.
///
/// Equality is exact: both values are integer minor currency units, so there
/// is no tolerance to apply. A mismatch is a signal for an operator to
/// investigate, never something the service corrects on its own: the stored
/// balance stays authoritative and the recomputed value is display-only.
pub fn reconcile(server_balance: i64, computed_net_balance: i64) -> Reconciliation {
    Reconciliation {
        server_balance,
        computed_net_balance,
        matches: server_balance == computed_net_balance,
    }
}
