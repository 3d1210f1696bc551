//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CASEFOLD_FUNCTION, CreateTable, MapRow},
    ledger::Predicate,
    models::{Transaction, TransactionBuilder, TransactionFields, TransactionID, UserID},
    stores::{
        TransactionStore,
        transaction::{DailyTotal, SortOrder, TransactionQuery},
    },
};

const TRANSACTION_COLUMNS: &str = "id, user_id, title, amount, transaction_type, category, date";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::models::User) model, the user
/// table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ValidationError] if the title is blank or the amount is not positive,
    /// - [Error::InvalidUser] if the builder's user does not exist,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        builder.validate()?;

        let connection = self.connection()?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" (user_id, title, amount, transaction_type, category, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    builder.user_id.as_i64(),
                    builder.title,
                    builder.amount,
                    builder.transaction_type,
                    builder.category,
                    builder.date,
                ],
                Self::map_row,
            )
            .map_err(|error| match error {
                // The client tried to add a transaction for a non-existent user.
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::InvalidUser(builder.user_id),
                error => error.into(),
            })?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionID) -> Result<Transaction, Error> {
        let transaction = self
            .connection()?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let (where_clause, query_parameters) = build_where_clause(query);
        let mut query_string_parts = vec![
            format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\""),
            where_clause,
        ];

        // Sort by date, and then ID to keep transaction order stable after updates
        match query.sort_date {
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY date ASC, id ASC".to_string())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC, id DESC".to_string())
            }
            None => {}
        }

        match query.limit {
            Some(limit) => {
                query_string_parts.push(format!("LIMIT {limit} OFFSET {}", query.offset))
            }
            // SQLite only accepts OFFSET after a LIMIT, a negative limit means no limit.
            None if query.offset > 0 => {
                query_string_parts.push(format!("LIMIT -1 OFFSET {}", query.offset))
            }
            None => {}
        }

        let query_string = query_string_parts.join(" ");
        tracing::debug!("querying transactions: {query_string}");

        self.connection()?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Count the transactions matching `query` without loading them.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        let (where_clause, query_parameters) = build_where_clause(query);
        let query_string = format!("SELECT COUNT(id) FROM \"transaction\" {where_clause}");

        let count: i64 = self.connection()?.query_row(
            &query_string,
            params_from_iter(query_parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    /// Sum the transactions matching `query` per date and transaction type.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn sum_by_date(&self, query: &TransactionQuery) -> Result<Vec<DailyTotal>, Error> {
        let (where_clause, query_parameters) = build_where_clause(query);
        let query_string = format!(
            "SELECT date, transaction_type, SUM(amount) FROM \"transaction\" {where_clause} \
            GROUP BY date, transaction_type \
            ORDER BY date ASC"
        );

        self.connection()?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(DailyTotal {
                    date: row.get(0)?,
                    transaction_type: row.get(1)?,
                    amount: row.get(2)?,
                })
            })?
            .map(|maybe_total| maybe_total.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the editable fields of a transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(
        &mut self,
        id: TransactionID,
        fields: &TransactionFields,
    ) -> Result<Transaction, Error> {
        let transaction = self
            .connection()?
            .prepare(&format!(
                "UPDATE \"transaction\"
                SET title = ?1, amount = ?2, transaction_type = ?3, category = ?4, date = ?5
                WHERE id = ?6
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    fields.title,
                    fields.amount,
                    fields.transaction_type,
                    fields.category,
                    fields.date,
                    id,
                ],
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Delete a transaction from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&mut self, id: TransactionID) -> Result<(), Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

/// Build the WHERE clause for the owner and predicates in `query`.
///
/// Returns an empty string when `query` has no conditions.
fn build_where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(user_id) = query.user_id {
        query_parameters.push(Value::Integer(user_id.as_i64()));
        where_clause_parts.push(format!("user_id = ?{}", query_parameters.len()));
    }

    for predicate in &query.predicates {
        match predicate {
            Predicate::OnOrAfter(start) => {
                query_parameters.push(Value::Text(start.to_string()));
                where_clause_parts.push(format!("date >= ?{}", query_parameters.len()));
            }
            Predicate::OnOrBefore(end) => {
                query_parameters.push(Value::Text(end.to_string()));
                where_clause_parts.push(format!("date <= ?{}", query_parameters.len()));
            }
            Predicate::CategoryContains(needle) => {
                // Same folding as `Predicate::matches`, instr has no wildcards.
                query_parameters.push(Value::Text(needle.to_lowercase()));
                where_clause_parts.push(format!(
                    "instr({CASEFOLD_FUNCTION}(category), ?{}) > 0",
                    query_parameters.len()
                ));
            }
        }
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            String::from("WHERE ") + &where_clause_parts.join(" AND "),
            query_parameters,
        )
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                    amount REAL NOT NULL CHECK (amount > 0),
                    transaction_type TEXT NOT NULL CHECK (transaction_type IN ('Income', 'Expense')),
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        // Composite index used by the dashboard query.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            title: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            transaction_type: row.get(offset + 4)?,
            category: row.get(offset + 5)?,
            date: row.get(offset + 6)?,
        })
    }
}
