//! This file defines the type `Transaction`, the core type of the ledger.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, EDIT_DATE_FORMAT, UserID},
};

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. buying groceries.
    Expense,
}

impl TransactionType {
    /// The name used for the type in the database and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse a transaction type, ignoring ASCII case.
    ///
    /// # Errors
    /// Returns [Error::ValidationError] for anything other than "Income" or "Expense".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(Error::validation(
                "type",
                format!("\"{s}\" is not one of Income or Expense"),
            ))
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free text category, e.g. "Groceries".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        title: &str,
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            title: title.to_owned(),
            amount,
            transaction_type,
            category: String::new(),
            date,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder is handed to a [TransactionStore](crate::stores::TransactionStore)
/// which assigns the ID.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that will own the transaction.
    pub user_id: UserID,
    /// A short description of what the transaction was for.
    ///
    /// Must not be empty.
    pub title: String,
    /// The monetary amount of the transaction.
    ///
    /// Must be a finite number greater than zero, the direction of the money
    /// is given by `transaction_type`.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
    /// The date when the transaction occurred.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Check the fields that the database cannot check for us.
    ///
    /// # Errors
    /// Returns an [Error::ValidationError] if the title is blank or the amount
    /// is not a positive number.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title", "title cannot be empty"));
        }

        validate_amount(self.amount)
    }
}

/// Check that `amount` is a usable transaction amount.
pub(crate) fn validate_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::validation(
            "amount",
            format!("{amount} is not a positive number"),
        ));
    }

    Ok(())
}

/// Format a date as a chart label, e.g. "05-01-2024" for 5 January 2024.
///
/// Labels use the same format as edited dates.
pub fn format_date_label(date: Date) -> String {
    date.format(EDIT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::{Date, macros::date};

    use crate::{
        Error,
        models::{EDIT_DATE_FORMAT, Transaction, TransactionType, UserID, format_date_label},
    };

    #[test]
    fn parses_transaction_type_ignoring_case() {
        assert_eq!(
            TransactionType::from_str("income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str(" EXPENSE "),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let result = TransactionType::from_str("Transfer");

        assert!(matches!(
            result,
            Err(Error::ValidationError { field: "type", .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let builder = Transaction::build(
            UserID::new(1),
            "   ",
            12.0,
            TransactionType::Expense,
            date!(2024 - 01 - 01),
        );

        assert!(matches!(
            builder.validate(),
            Err(Error::ValidationError { field: "title", .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_amounts() {
        for amount in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let builder = Transaction::build(
                UserID::new(1),
                "Coffee",
                amount,
                TransactionType::Expense,
                date!(2024 - 01 - 01),
            );

            assert!(
                matches!(
                    builder.validate(),
                    Err(Error::ValidationError {
                        field: "amount",
                        ..
                    })
                ),
                "want amount {amount} to be rejected"
            );
        }
    }

    #[test]
    fn validate_accepts_well_formed_transaction() {
        let builder = Transaction::build(
            UserID::new(1),
            "Salary",
            2500.0,
            TransactionType::Income,
            date!(2024 - 01 - 31),
        )
        .category("Salary");

        assert_eq!(builder.validate(), Ok(()));
    }

    #[test]
    fn date_label_parses_as_edit_date() {
        let date = date!(2024 - 02 - 29);

        let got = Date::parse(&format_date_label(date), EDIT_DATE_FORMAT);

        assert_eq!(got, Ok(date));
    }

    #[test]
    fn formats_date_label_as_day_month_year() {
        assert_eq!(format_date_label(date!(2024 - 01 - 05)), "05-01-2024");
        assert_eq!(format_date_label(date!(2023 - 12 - 31)), "31-12-2023");
        assert_eq!(format_date_label(date!(0999 - 03 - 09)), "09-03-0999");
    }
}
