//! Income and expense totals, and the per-day series for the dashboard chart.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    models::{Transaction, TransactionType, format_date_label},
    stores::DailyTotal,
};

/// Totals and a per-day time series over a set of transactions.
///
/// `labels`, `income_values` and `expense_values` have the same length, the
/// values at index `i` belong to the date at `labels[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// The distinct dates formatted as "DD-MM-YYYY", oldest first.
    pub labels: Vec<String>,
    /// The income on each date, zero if there was none.
    pub income_values: Vec<f64>,
    /// The expenses on each date, zero if there were none.
    pub expense_values: Vec<f64>,
}

/// Aggregate individual transactions, e.g. the items on one page.
pub fn aggregate_transactions(transactions: &[Transaction]) -> Aggregation {
    let mut accumulator = Accumulator::default();

    for transaction in transactions {
        accumulator.add(
            transaction.date,
            transaction.transaction_type,
            transaction.amount,
        );
    }

    accumulator.finish()
}

/// Aggregate totals that a store has already summed per day.
pub fn aggregate_daily_totals(daily_totals: &[DailyTotal]) -> Aggregation {
    let mut accumulator = Accumulator::default();

    for total in daily_totals {
        accumulator.add(total.date, total.transaction_type, total.amount);
    }

    accumulator.finish()
}

#[derive(Default)]
struct Accumulator {
    total_income: f64,
    total_expense: f64,
    /// (income, expense) per date, kept in chronological order.
    by_date: BTreeMap<Date, (f64, f64)>,
}

impl Accumulator {
    fn add(&mut self, date: Date, transaction_type: TransactionType, amount: f64) {
        let day = self.by_date.entry(date).or_insert((0.0, 0.0));

        match transaction_type {
            TransactionType::Income => {
                self.total_income += amount;
                day.0 += amount;
            }
            TransactionType::Expense => {
                self.total_expense += amount;
                day.1 += amount;
            }
        }
    }

    fn finish(self) -> Aggregation {
        let mut labels = Vec::with_capacity(self.by_date.len());
        let mut income_values = Vec::with_capacity(self.by_date.len());
        let mut expense_values = Vec::with_capacity(self.by_date.len());

        for (date, (income, expense)) in self.by_date {
            labels.push(format_date_label(date));
            income_values.push(income);
            expense_values.push(expense);
        }

        Aggregation {
            total_income: self.total_income,
            total_expense: self.total_expense,
            balance: self.total_income - self.total_expense,
            labels,
            income_values,
            expense_values,
        }
    }
}
