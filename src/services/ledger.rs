//! Balance ledger service
//!
//! Owns the daily balance lifecycle: recording expenses, aggregating them by
//! date and range, and recomputing the carry-forward daily balance snapshot
//! from the sales store and the expense book.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use tracing::error;

use crate::error::{TillbookError, TillbookResult};
use crate::models::{DailyBalance, Expense, Money};
use crate::storage::Storage;

/// Service for ledger operations
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a manual expense
    ///
    /// Validation failures (non-positive amount, empty description) are
    /// rejected before any write. Persistence failures are logged with
    /// context and surfaced as an error result, never a panic.
    pub fn record_expense(
        &self,
        description: impl Into<String>,
        amount: Money,
        created_by: impl Into<String>,
        expense_date: NaiveDate,
    ) -> TillbookResult<Expense> {
        let expense = Expense::new(description, amount, created_by, expense_date);
        expense
            .validate()
            .map_err(TillbookError::Validation)?;

        if let Err(e) = self
            .storage
            .expenses
            .insert(expense.clone())
            .and_then(|_| self.storage.expenses.save())
        {
            error!(
                expense_date = %expense_date,
                expense_id = %expense.id,
                "failed to record expense: {e}"
            );
            return Err(e);
        }

        Ok(expense)
    }

    /// Sum of expenses recorded on a date, zero when none
    pub fn expenses_for_date(&self, date: NaiveDate) -> TillbookResult<Money> {
        self.storage.expenses.total_for_date(date)
    }

    /// Expenses in an inclusive date range, ordered for audit display
    pub fn expenses_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TillbookResult<Vec<Expense>> {
        self.storage.expenses.get_by_date_range(start, end)
    }

    /// Total expenses for the current ISO week (Monday through Sunday)
    pub fn expenses_for_week(&self) -> TillbookResult<Money> {
        let today = Local::now().date_naive();
        let monday = today.week(Weekday::Mon).first_day();
        let sunday = today.week(Weekday::Mon).last_day();
        Ok(self
            .expenses_for_range(monday, sunday)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// Total expenses for the current calendar month
    pub fn expenses_for_month(&self) -> TillbookResult<Money> {
        let today = Local::now().date_naive();
        let first = today.with_day(1).unwrap_or(today);
        let last = month_end(today.year(), today.month());
        Ok(self
            .expenses_for_range(first, last)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// Recompute and persist the daily balance for a date
    ///
    /// The opening balance carries forward from the most recent stored record
    /// before `date` (zero when none). Income is the day's completed sales;
    /// expenses are the day's recorded outflows. Idempotent: re-running for a
    /// date with unchanged underlying transactions stores the same values.
    /// When bootstrapping history, call in non-decreasing date order so each
    /// day sees its predecessor's closing balance.
    pub fn update_daily_balance(&self, date: NaiveDate) -> TillbookResult<DailyBalance> {
        let income = self.storage.sales.sum_completed(date)?;
        let expenses = self.storage.expenses.total_for_date(date)?;

        let balance = self
            .storage
            .balances
            .recompute(date, income, expenses)
            .and_then(|balance| {
                self.storage.balances.save()?;
                Ok(balance)
            })
            .map_err(|e| {
                error!(date = %date, "failed to update daily balance: {e}");
                e
            })?;

        Ok(balance)
    }

    /// Opening balance for a date
    ///
    /// Returns the persisted opening when a record exists, otherwise the
    /// carry-forward value from the most recent prior record, otherwise zero.
    pub fn opening_balance(&self, date: NaiveDate) -> TillbookResult<Money> {
        if let Some(balance) = self.storage.balances.get(date)? {
            return Ok(balance.opening_balance);
        }
        Ok(self
            .storage
            .balances
            .latest_before(date)?
            .map(|b| b.closing_balance)
            .unwrap_or_else(Money::zero))
    }

    /// Completed sales total for the current date
    pub fn todays_income(&self) -> TillbookResult<Money> {
        self.storage.sales.sum_completed(Local::now().date_naive())
    }

    /// Completed sales total over an inclusive date range
    pub fn income_for_range(&self, start: NaiveDate, end: NaiveDate) -> TillbookResult<Money> {
        Ok(self
            .storage
            .sales
            .get_by_date_range(start, end)?
            .iter()
            .filter(|s| s.status.is_completed())
            .map(|s| s.amount)
            .sum())
    }
}

/// Last day of a calendar month
fn month_end(year: i32, month: u32) -> NaiveDate {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.unwrap() - chrono::Duration::days(1)
}
