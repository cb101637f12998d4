//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a savings account row.
pub type AccountId = DatabaseId;
/// The ID of a savings transaction row.
pub type TransactionId = DatabaseId;
/// The ID of the student (santri) that owns a savings account.
pub type StudentId = DatabaseId;
