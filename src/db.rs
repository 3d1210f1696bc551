/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row, functions::FunctionFlags};

use crate::stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type built from a row.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// The name of the SQL function that lowercases text with Unicode rules.
///
/// SQLite's own `lower` and `LIKE` only fold ASCII letters.
pub const CASEFOLD_FUNCTION: &str = "casefold";

/// Create the tables for the domain models and register the SQL functions
/// the stores use.
///
/// Safe to call on a database that has already been initialized. Functions
/// are per connection, so call this for every new connection.
///
/// # Errors
/// Returns an error if foreign keys cannot be enabled, a function cannot be
/// registered or a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    connection.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text: String = context.get(0)?;
            Ok(text.to_lowercase())
        },
    )?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialization failed");
        initialize(&conn).expect("second initialization failed");

        let sequence_rows: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_sequence WHERE name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(
            sequence_rows <= 1,
            "want at most one sequence row, got {sequence_rows}"
        );
    }

    #[test]
    fn casefold_lowercases_non_ascii_letters() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT casefold('ÉPICERIE Café')", [], |row| row.get(0))
            .unwrap();

        assert_eq!(folded, "épicerie café");
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let enabled: bool = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(enabled, "foreign keys should be enforced");
    }
}
