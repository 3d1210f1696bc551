//! The ledger query engine.
//!
//! A [Ledger] owns a user store and a transaction store and implements the
//! operations behind the dashboard: querying a filtered, paged view of a
//! user's transactions with aggregated totals, and editing or deleting a
//! transaction on behalf of its owner.

mod aggregation;
mod filter;
mod mutation;
mod query;
mod register;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregation::{Aggregation, aggregate_daily_totals, aggregate_transactions};
pub use filter::{LedgerFilter, Predicate};
pub use mutation::{Mutation, MutationOutcome, apply_mutation};
pub use query::{LedgerPage, query_ledger};
pub use register::register_user;

use crate::{
    Error, LedgerConfig,
    models::{
        PasswordHash, Transaction, TransactionBuilder, TransactionForm, TransactionID, User,
        UserID,
    },
    pagination::PageRequest,
    stores::{TransactionStore, UserStore},
};

/// The ledger engine over a pair of stores.
///
/// The stores are injected so the engine can run over SQLite or any other
/// [UserStore] and [TransactionStore] implementation.
#[derive(Debug, Clone)]
pub struct Ledger<U, T>
where
    U: UserStore,
    T: TransactionStore,
{
    user_store: U,
    transaction_store: T,
    config: LedgerConfig,
}

impl<U, T> Ledger<U, T>
where
    U: UserStore,
    T: TransactionStore,
{
    /// Create a new ledger over the given stores.
    pub fn new(user_store: U, transaction_store: T, config: LedgerConfig) -> Self {
        Self {
            user_store,
            transaction_store,
            config,
        }
    }

    /// The config the ledger was created with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The store for users.
    pub fn user_store(&self) -> &U {
        &self.user_store
    }

    /// The store for transactions.
    pub fn transaction_store(&self) -> &T {
        &self.transaction_store
    }

    /// Register a new user.
    ///
    /// See [register_user] for the errors this may return.
    pub fn register_user(
        &mut self,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        register_user(&mut self.user_store, username, email, password_hash)
    }

    /// Record a new transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidUser] if the builder's user is not registered,
    /// - [Error::ValidationError] if the title is blank or the amount is not positive,
    /// - or an error from the store.
    pub fn record_transaction(
        &mut self,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let user_id = builder.user_id;

        self.user_store.get(user_id).map_err(|error| match error {
            Error::NotFound => Error::InvalidUser(user_id),
            error => error,
        })?;

        let transaction = self.transaction_store.create(builder)?;
        tracing::info!("user {user_id} recorded transaction {}", transaction.id);

        Ok(transaction)
    }

    /// Record a new transaction from text input, with the date as "YYYY-MM-DD".
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] naming the first invalid field, or
    /// any error from [Ledger::record_transaction].
    pub fn add_transaction(
        &mut self,
        user_id: UserID,
        form: &TransactionForm,
    ) -> Result<Transaction, Error> {
        let fields = form.parse_new()?;

        self.record_transaction(
            Transaction::build(
                user_id,
                &fields.title,
                fields.amount,
                fields.transaction_type,
                fields.date,
            )
            .category(&fields.category),
        )
    }

    /// Get a page of `user_id`'s transactions that match `filter`, with the
    /// aggregations selected by the ledger's [AggregationScope](crate::AggregationScope).
    ///
    /// See [query_ledger] for the ordering and errors.
    pub fn query(
        &self,
        user_id: UserID,
        filter: &LedgerFilter,
        page_request: PageRequest,
    ) -> Result<LedgerPage, Error> {
        query_ledger(
            &self.user_store,
            &self.transaction_store,
            user_id,
            filter,
            page_request,
            self.config.aggregation_scope,
        )
    }

    /// Edit or delete a transaction on behalf of `requesting_user_id`.
    ///
    /// See [apply_mutation] for the errors this may return.
    pub fn apply_mutation(
        &mut self,
        transaction_id: TransactionID,
        requesting_user_id: UserID,
        mutation: Mutation,
    ) -> Result<MutationOutcome, Error> {
        apply_mutation(
            &mut self.transaction_store,
            transaction_id,
            requesting_user_id,
            mutation,
        )
    }
}
