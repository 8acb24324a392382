//! Period summary
//!
//! The ledger-side half of a report: opening balance at range start, income
//! and expenses summed over the range, and the derived net/closing values.
//! Derived on demand, never persisted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TillbookResult;
use crate::models::Money;
use crate::services::LedgerService;
use crate::storage::Storage;

/// Balance summary for a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Ledger balance carried into the range
    pub opening_balance: Money,
    /// Completed sales total over the range
    pub total_income: Money,
    /// Recorded expenses total over the range
    pub total_expenses: Money,
    /// total_income - total_expenses
    pub net_balance: Money,
    /// opening_balance + net_balance
    pub closing_balance: Money,
}

impl PeriodSummary {
    /// Generate a summary for an inclusive date range
    pub fn generate(storage: &Storage, start: NaiveDate, end: NaiveDate) -> TillbookResult<Self> {
        let ledger = LedgerService::new(storage);

        let opening_balance = ledger.opening_balance(start)?;
        let total_income = ledger.income_for_range(start, end)?;
        let total_expenses: Money = ledger
            .expenses_for_range(start, end)?
            .iter()
            .map(|e| e.amount)
            .sum();

        let net_balance = total_income - total_expenses;

        Ok(Self {
            opening_balance,
            total_income,
            total_expenses,
            net_balance,
            closing_balance: opening_balance + net_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TillbookPaths;
    use crate::models::{CustomerId, Sale, SaleStatus};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TillbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_completed_sale(storage: &Storage, cents: i64, d: NaiveDate) {
        let sale = Sale::with_details(
            CustomerId::new(),
            "Customer",
            "haircut",
            Money::from_cents(cents),
            Money::zero(),
            SaleStatus::Completed,
            d,
        );
        storage.sales.upsert(sale).unwrap();
    }

    #[test]
    fn test_empty_range_is_all_zero() {
        let (_temp_dir, storage) = create_test_storage();

        let summary =
            PeriodSummary::generate(&storage, date(2025, 3, 10), date(2025, 3, 16)).unwrap();

        assert!(summary.opening_balance.is_zero());
        assert!(summary.total_income.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.net_balance.is_zero());
        assert!(summary.closing_balance.is_zero());
    }

    #[test]
    fn test_summary_over_multi_day_range() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);

        // Prior history so the range opens with a carried balance
        add_completed_sale(&storage, 5000, date(2025, 3, 5));
        ledger.update_daily_balance(date(2025, 3, 5)).unwrap();

        add_completed_sale(&storage, 10000, date(2025, 3, 10));
        add_completed_sale(&storage, 4000, date(2025, 3, 12));
        ledger
            .record_expense("Stock", Money::from_cents(3000), "admin", date(2025, 3, 11))
            .unwrap();

        let summary =
            PeriodSummary::generate(&storage, date(2025, 3, 10), date(2025, 3, 16)).unwrap();

        assert_eq!(summary.opening_balance.cents(), 5000);
        assert_eq!(summary.total_income.cents(), 14000);
        assert_eq!(summary.total_expenses.cents(), 3000);
        assert_eq!(summary.net_balance.cents(), 11000);
        assert_eq!(summary.closing_balance.cents(), 16000);
    }

    #[test]
    fn test_closing_follows_ledger_recurrence() {
        let (_temp_dir, storage) = create_test_storage();

        add_completed_sale(&storage, 2000, date(2025, 3, 10));

        let summary =
            PeriodSummary::generate(&storage, date(2025, 3, 10), date(2025, 3, 10)).unwrap();

        assert_eq!(
            summary.closing_balance,
            summary.opening_balance + summary.total_income - summary.total_expenses
        );
    }
}
