//! The dashboard query: one page of a user's filtered transactions with totals.

use serde::Serialize;

use crate::{
    AggregationScope, Error,
    ledger::{
        LedgerFilter,
        aggregation::{Aggregation, aggregate_daily_totals, aggregate_transactions},
    },
    models::{Transaction, UserID},
    pagination::{PageRequest, PaginationIndicator, create_pagination_indicators},
    stores::{SortOrder, TransactionQuery, TransactionStore, UserStore},
};

/// One page of a ledger query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerPage {
    /// The transactions on this page, newest first.
    pub items: Vec<Transaction>,
    /// The number of transactions matching the filter across all pages.
    pub total: u64,
    /// The 1-indexed page number.
    pub page: u64,
    /// The maximum number of transactions on a page.
    pub page_size: u64,
    /// The number of pages needed for `total` transactions.
    pub page_count: u64,
    /// Totals and chart data for `items` only.
    pub page_aggregation: Aggregation,
    /// Totals and chart data for every matching transaction.
    ///
    /// Only computed for [AggregationScope::Filtered].
    pub filtered_aggregation: Option<Aggregation>,
}

impl LedgerPage {
    /// The aggregation a dashboard should show for `scope`.
    pub fn aggregation(&self, scope: AggregationScope) -> &Aggregation {
        match (scope, &self.filtered_aggregation) {
            (AggregationScope::Filtered, Some(aggregation)) => aggregation,
            _ => &self.page_aggregation,
        }
    }

    /// The page navigator links for this page.
    pub fn pagination_indicators(&self, max_pages: u64) -> Vec<PaginationIndicator> {
        create_pagination_indicators(self.page, self.page_count, max_pages)
    }
}

/// Get a page of `user_id`'s transactions that match `filter`.
///
/// Transactions are ordered by date, newest first, with ties broken by the
/// most recently created transaction. Asking for a page past the last page
/// gives no items but still reports the total.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if `user_id` does not refer to a registered user,
/// - [Error::InvalidFilter] if the filter's start date is after its end date,
/// - or an error from the stores.
pub fn query_ledger<U, T>(
    user_store: &U,
    transaction_store: &T,
    user_id: UserID,
    filter: &LedgerFilter,
    page_request: PageRequest,
    scope: AggregationScope,
) -> Result<LedgerPage, Error>
where
    U: UserStore,
    T: TransactionStore,
{
    user_store.get(user_id).map_err(|error| match error {
        Error::NotFound => Error::InvalidUser(user_id),
        error => error,
    })?;

    let matching = TransactionQuery {
        user_id: Some(user_id),
        predicates: filter.predicates()?,
        ..Default::default()
    };

    let total = transaction_store.count(&matching)?;

    let items = if page_request.offset() < total {
        transaction_store.get_query(&TransactionQuery {
            sort_date: Some(SortOrder::Descending),
            limit: Some(page_request.limit()),
            offset: page_request.offset(),
            ..matching.clone()
        })?
    } else {
        Vec::new()
    };

    let filtered_aggregation = match scope {
        AggregationScope::Page => None,
        AggregationScope::Filtered => Some(aggregate_daily_totals(
            &transaction_store.sum_by_date(&matching)?,
        )),
    };

    tracing::debug!(
        "ledger query for user {user_id}: {} of {total} transactions on page {}",
        items.len(),
        page_request.page()
    );

    Ok(LedgerPage {
        page_aggregation: aggregate_transactions(&items),
        items,
        total,
        page: page_request.page(),
        page_size: page_request.page_size(),
        page_count: page_request.page_count(total),
        filtered_aggregation,
    })
}
