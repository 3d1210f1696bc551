//! Ledger is a personal finance tracker for recording income and expenses.
//!
//! This library provides the ledger query engine that backs the dashboard:
//! filtering a user's transactions, paging through them, and aggregating
//! income and expenses into totals and a per-day time series. It also
//! provides the SQLite backed stores the engine reads from and writes to.

#![warn(missing_docs)]

pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod stores;

pub use config::{AggregationScope, LedgerConfig};
pub use db::initialize as initialize_db;
pub use ledger::{Ledger, LedgerFilter, LedgerPage, Mutation};
pub use models::{Transaction, TransactionType, User, UserID};

use time::Date;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user ID does not refer to a registered user.
    #[error("the user ID {0} does not refer to a valid user")]
    InvalidUser(UserID),

    /// The requesting user does not own the transaction they tried to change.
    #[error("you do not have permission to modify this transaction")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The start of a date range filter is after its end.
    #[error("the start date {start} is after the end date {end}")]
    InvalidFilter {
        /// The inclusive lower bound of the range.
        start: Date,
        /// The inclusive upper bound of the range.
        end: Date,
    },

    /// A field of user input could not be parsed or did not pass validation.
    ///
    /// `field` names the offending input so the message can be shown next to it.
    #[error("invalid {field}: {message}")]
    ValidationError {
        /// The name of the field that failed validation.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// The email address is already registered to another user.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The username is already taken by another user.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Shortcut for creating a [Error::ValidationError].
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::ValidationError {
            field,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
