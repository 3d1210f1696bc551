//! Defines the transaction store trait.

use time::Date;

use crate::{
    Error,
    ledger::Predicate,
    models::{
        Transaction, TransactionBuilder, TransactionFields, TransactionID, TransactionType, UserID,
    },
};

/// Handles the creation, retrieval and modification of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// Implementers should return [Error::InvalidUser] if the builder's user
    /// does not exist.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns [Error::NotFound] if `id` does not refer to a stored transaction.
    fn get(&self, id: TransactionID) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions that match `query`, ignoring its sort order,
    /// limit and offset.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error>;

    /// Sum the amounts of the transactions that match `query` for each date
    /// and transaction type, ignoring its limit and offset.
    ///
    /// The totals are returned in ascending date order.
    fn sum_by_date(&self, query: &TransactionQuery) -> Result<Vec<DailyTotal>, Error>;

    /// Overwrite every editable field of the transaction `id`.
    ///
    /// Returns [Error::NotFound] if `id` does not refer to a stored transaction.
    fn update(
        &mut self,
        id: TransactionID,
        fields: &TransactionFields,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction `id` from the store.
    ///
    /// Returns [Error::NotFound] if `id` does not refer to a stored transaction.
    fn delete(&mut self, id: TransactionID) -> Result<(), Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
///
/// All conditions are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions owned by this user.
    pub user_id: Option<UserID>,
    /// Conditions each transaction must satisfy.
    pub predicates: Vec<Predicate>,
    /// Orders transactions by date in the order `sort_date`, ties are broken by ID in the same
    /// direction. None returns transactions in the order they are stored.
    pub sort_date: Option<SortOrder>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Skip the first N transactions.
    pub offset: u64,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// The total amount of one type of transaction on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    /// The day the transactions happened on.
    pub date: Date,
    /// The type of the summed transactions.
    pub transaction_type: TransactionType,
    /// The sum of the transaction amounts.
    pub amount: f64,
}
