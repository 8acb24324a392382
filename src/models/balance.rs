//! Daily balance model
//!
//! One record per calendar date. The opening balance is carried forward from
//! the previous day's closing balance, so for chronologically adjacent records
//! `next.opening_balance == prev.closing_balance`. Records are only ever
//! written by the ledger's recompute operation, never edited directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Daily balance snapshot for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBalance {
    /// Calendar day (unique key)
    pub date: NaiveDate,

    /// Balance carried in from the previous day's closing balance
    pub opening_balance: Money,

    /// Sum of the day's completed sales
    pub total_income: Money,

    /// Sum of the day's recorded expenses
    pub total_expenses: Money,

    /// opening_balance + total_income - total_expenses
    pub closing_balance: Money,
}

impl DailyBalance {
    /// Compute a daily balance from its inputs
    ///
    /// The closing balance is always derived, keeping the
    /// `closing = opening + income - expenses` identity by construction.
    pub fn compute(
        date: NaiveDate,
        opening_balance: Money,
        total_income: Money,
        total_expenses: Money,
    ) -> Self {
        Self {
            date,
            opening_balance,
            total_income,
            total_expenses,
            closing_balance: opening_balance + total_income - total_expenses,
        }
    }

    /// Net movement for the day (income minus expenses)
    pub fn net_change(&self) -> Money {
        self.total_income - self.total_expenses
    }
}
