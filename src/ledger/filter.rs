//! Filter criteria for narrowing a ledger query.
//!
//! A [LedgerFilter] is compiled once into a list of [Predicate]s that are
//! combined with AND. Stores push the predicates down into their queries and
//! [LedgerFilter::matches] evaluates the same predicates in memory.

use serde::Serialize;
use time::Date;

use crate::{Error, models::Transaction};

/// A single condition a transaction must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The transaction happened on or after this date.
    OnOrAfter(Date),
    /// The transaction happened on or before this date.
    OnOrBefore(Date),
    /// The category contains this text, ignoring case.
    CategoryContains(String),
}

impl Predicate {
    /// Whether `transaction` satisfies this predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Predicate::OnOrAfter(start) => transaction.date >= *start,
            Predicate::OnOrBefore(end) => transaction.date <= *end,
            Predicate::CategoryContains(needle) => transaction
                .category
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// The optional criteria for a ledger query.
///
/// Absent criteria do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerFilter {
    /// Keep transactions on or after this date.
    pub start_date: Option<Date>,
    /// Keep transactions on or before this date.
    pub end_date: Option<Date>,
    /// Keep transactions whose category contains this text, ignoring case.
    /// Blank text is treated as no filter.
    pub category: Option<String>,
}

impl LedgerFilter {
    /// Check that the criteria can be satisfied.
    ///
    /// # Errors
    /// Returns [Error::InvalidFilter] if the start date is after the end date.
    pub fn validate(&self) -> Result<(), Error> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidFilter { start, end }),
            _ => Ok(()),
        }
    }

    /// Compile the criteria that were provided into predicates.
    ///
    /// # Errors
    /// Returns [Error::InvalidFilter] if the start date is after the end date.
    pub fn predicates(&self) -> Result<Vec<Predicate>, Error> {
        self.validate()?;

        let mut predicates = Vec::with_capacity(3);

        if let Some(start) = self.start_date {
            predicates.push(Predicate::OnOrAfter(start));
        }

        if let Some(end) = self.end_date {
            predicates.push(Predicate::OnOrBefore(end));
        }

        if let Some(category) = self
            .category
            .as_deref()
            .filter(|category| !category.trim().is_empty())
        {
            predicates.push(Predicate::CategoryContains(category.to_owned()));
        }

        Ok(predicates)
    }

    /// Whether `transaction` satisfies every provided criterion.
    ///
    /// An invalid date range matches nothing.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self.predicates() {
            Ok(predicates) => predicates
                .iter()
                .all(|predicate| predicate.matches(transaction)),
            Err(_) => false,
        }
    }
}
