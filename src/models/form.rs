//! Raw text input for creating and editing transactions.
//!
//! Clients submit every field as text. [TransactionForm] turns that text into
//! typed [TransactionFields], reporting the first field that fails to parse.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    models::{TransactionType, transaction::validate_amount},
};

/// The date format accepted when editing a transaction, e.g. "31-01-2024".
pub const EDIT_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]-[month]-[year]");

/// The date format accepted when creating a transaction, e.g. "2024-01-31".
pub const NEW_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The fields of a transaction as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount as a decimal number, e.g. "12.50".
    pub amount: String,
    /// Either "Income" or "Expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// A free text category.
    pub category: String,
    /// The date in the format expected by the caller.
    pub date: String,
}

/// The validated, typed fields of a [TransactionForm].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    /// A non-empty title.
    pub title: String,
    /// A finite, positive amount.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category, trimmed of surrounding whitespace.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

impl TransactionForm {
    /// Parse the form with dates in the `DD-MM-YYYY` edit format.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] naming the first invalid field.
    pub fn parse_edit(&self) -> Result<TransactionFields, Error> {
        self.parse(EDIT_DATE_FORMAT)
    }

    /// Parse the form with dates in the `YYYY-MM-DD` format used when adding
    /// a new transaction.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] naming the first invalid field.
    pub fn parse_new(&self) -> Result<TransactionFields, Error> {
        self.parse(NEW_DATE_FORMAT)
    }

    fn parse(&self, date_format: &[BorrowedFormatItem]) -> Result<TransactionFields, Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::validation("title", "title cannot be empty"));
        }

        let amount: f64 = self.amount.trim().parse().map_err(|_| {
            Error::validation("amount", format!("\"{}\" is not a number", self.amount))
        })?;
        validate_amount(amount)?;

        let transaction_type = self.transaction_type.parse()?;

        let date = Date::parse(self.date.trim(), date_format).map_err(|error| {
            Error::validation("date", format!("could not parse \"{}\": {error}", self.date))
        })?;

        Ok(TransactionFields {
            title: title.to_owned(),
            amount,
            transaction_type,
            category: self.category.trim().to_owned(),
            date,
        })
    }
}
