//! Settings that control how ledger queries are paged and aggregated.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationConfig;

/// Which transactions the totals and chart of a ledger query are computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AggregationScope {
    /// Only the transactions on the requested page.
    #[default]
    Page,
    /// The transactions on the requested page, and separately every
    /// transaction that matches the filter.
    Filtered,
}

/// The config for a [Ledger](crate::Ledger).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerConfig {
    /// The default page number and size, and the size of the page navigator.
    pub pagination: PaginationConfig,
    /// Whether to also aggregate over the full filtered set of transactions.
    pub aggregation_scope: AggregationScope,
}

impl LedgerConfig {
    /// Use `page_size` as the default number of transactions per page.
    ///
    /// A size of zero is treated as one.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.pagination.default_page_size = page_size.max(1);
        self
    }

    /// Set which transactions are aggregated.
    pub fn with_aggregation_scope(mut self, aggregation_scope: AggregationScope) -> Self {
        self.aggregation_scope = aggregation_scope;
        self
    }
}
