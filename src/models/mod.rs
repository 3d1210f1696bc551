//! This module defines the domain data types.

pub use form::{EDIT_DATE_FORMAT, NEW_DATE_FORMAT, TransactionFields, TransactionForm};
pub use password::PasswordHash;
pub use transaction::{Transaction, TransactionBuilder, TransactionType, format_date_label};
pub use user::{User, UserID};

mod form;
mod password;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

/// Alias for the database ID of a [Transaction].
pub type TransactionID = DatabaseID;
