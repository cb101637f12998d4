//! This module defines the policy knobs for the savings ledger.

/// The config that controls what the savings ledger accepts.
#[derive(Debug, Clone)]
pub struct LedgerPolicy {
    /// The smallest amount, in minor currency units (whole rupiah), accepted
    /// for a new transaction.
    pub minimum_transaction_amount: i64,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            minimum_transaction_amount: 1000,
        }
    }
}
