//! Contains convenience type alias and function for a [Ledger] that uses
//! the SQLite backend.

mod transaction;
mod user;

pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, Ledger, LedgerConfig, db::initialize};

/// An alias for a [Ledger] that uses SQLite for the backend.
pub type SQLiteLedger = Ledger<SQLiteUserStore, SQLiteTransactionStore>;

/// Creates a [Ledger] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_ledger(
    db_connection: Connection,
    config: LedgerConfig,
) -> Result<SQLiteLedger, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(Ledger::new(
        SQLiteUserStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection),
        config,
    ))
}
