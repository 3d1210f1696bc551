//! Helpers for testing the ledger against an in-memory SQLite database.

use rusqlite::Connection;
use time::Date;

use crate::{
    AggregationScope, Error, LedgerConfig,
    models::{PasswordHash, Transaction, TransactionID, TransactionType, UserID},
    stores::{
        TransactionStore,
        sqlite::{SQLiteLedger, create_ledger},
    },
};

pub(crate) struct LedgerFixture {
    pub ledger: SQLiteLedger,
}

impl LedgerFixture {
    pub fn new() -> Self {
        Self::with_scope(AggregationScope::Page)
    }

    pub fn with_scope(scope: AggregationScope) -> Self {
        let connection = Connection::open_in_memory().unwrap();
        let config = LedgerConfig::default().with_aggregation_scope(scope);

        Self {
            ledger: create_ledger(connection, config).unwrap(),
        }
    }

    /// Register a user called `name` with the email `name@example.com`.
    pub fn user(&mut self, name: &str) -> UserID {
        self.ledger
            .register_user(
                name,
                &format!("{name}@example.com"),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap()
            .id
    }

    pub fn add(
        &mut self,
        user_id: UserID,
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
        category: &str,
    ) -> Transaction {
        self.ledger
            .record_transaction(
                Transaction::build(user_id, "test transaction", amount, transaction_type, date)
                    .category(category),
            )
            .unwrap()
    }

    pub fn get(&self, id: TransactionID) -> Result<Transaction, Error> {
        self.ledger.transaction_store().get(id)
    }
}
