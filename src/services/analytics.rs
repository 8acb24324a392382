//! Analytics aggregation service
//!
//! Builds one combined report per reporting grain: daily, weekly (ISO week
//! containing a date), and monthly. Each build resolves the date range,
//! reuses the ledger for the period summary, and derives the analytics from
//! read-only queries. Nothing persisted is ever mutated here.

use chrono::{NaiveDate, Utc};
use tracing::{error, info};

use crate::config::Settings;
use crate::error::{TillbookError, TillbookResult};
use crate::models::ReportPeriod;
use crate::reports::{AnalyticsReport, PeriodSummary, ReportBundle};
use crate::storage::Storage;

/// Service for building period reports
pub struct AnalyticsService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new analytics service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Build the report for a single day
    pub fn build_daily_report(&self, date: NaiveDate) -> TillbookResult<ReportBundle> {
        self.build(ReportPeriod::day_of(date))
    }

    /// Build the report for the ISO week (Monday-Sunday) containing a date
    pub fn build_weekly_report(&self, date: NaiveDate) -> TillbookResult<ReportBundle> {
        self.build(ReportPeriod::week_of(date))
    }

    /// Build the report for a calendar month
    pub fn build_monthly_report(&self, year: i32, month: u32) -> TillbookResult<ReportBundle> {
        if !(1..=12).contains(&month) {
            return Err(TillbookError::Validation(format!("invalid month: {}", month)));
        }
        self.build(ReportPeriod::month_of(year, month))
    }

    /// Build the combined report for a resolved period
    ///
    /// Only a hard storage failure aborts; ranges with no data come back
    /// with zero-valued fields throughout.
    fn build(&self, period: ReportPeriod) -> TillbookResult<ReportBundle> {
        let start = period.start_date();
        let end = period.end_date();

        let summary = PeriodSummary::generate(self.storage, start, end).map_err(|e| {
            error!(period = %period, "failed to build period summary: {e}");
            TillbookError::Report(format!("period summary for {}: {}", period, e))
        })?;

        let analytics =
            AnalyticsReport::generate(self.storage, start, end, self.settings.top_customer_count)
                .map_err(|e| {
                    error!(period = %period, "failed to build analytics: {e}");
                    TillbookError::Report(format!("analytics for {}: {}", period, e))
                })?;

        info!(period = %period, "report built");

        Ok(ReportBundle {
            period,
            start_date: start,
            end_date: end,
            generated_at: Utc::now(),
            summary,
            analytics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TillbookPaths;
    use crate::models::{CustomerId, Money, Sale, SaleStatus};
    use crate::services::LedgerService;
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
    fn test_daily_report_covers_one_day() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = AnalyticsService::new(&storage, &settings);

        add_completed_sale(&storage, 10000, date(2025, 3, 10));
        add_completed_sale(&storage, 9999, date(2025, 3, 11));

        let bundle = service.build_daily_report(date(2025, 3, 10)).unwrap();

        assert_eq!(bundle.start_date, date(2025, 3, 10));
        assert_eq!(bundle.end_date, date(2025, 3, 10));
        assert_eq!(bundle.summary.total_income.cents(), 10000);
        assert_eq!(bundle.filename_hint(), "daily-report-2025-03-10");
    }

    #[test]
    fn test_weekly_report_resolves_monday_to_sunday() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = AnalyticsService::new(&storage, &settings);

        // 2025-03-12 is a Wednesday
        let bundle = service.build_weekly_report(date(2025, 3, 12)).unwrap();

        assert_eq!(bundle.start_date, date(2025, 3, 10));
        assert_eq!(bundle.end_date, date(2025, 3, 16));
    }

    #[test]
    fn test_monthly_report_resolves_calendar_month() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = AnalyticsService::new(&storage, &settings);

        let bundle = service.build_monthly_report(2025, 2).unwrap();

        assert_eq!(bundle.start_date, date(2025, 2, 1));
        assert_eq!(bundle.end_date, date(2025, 2, 28));
    }

    #[test]
    fn test_monthly_report_rejects_invalid_month() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = AnalyticsService::new(&storage, &settings);

        let result = service.build_monthly_report(2025, 13);
        assert!(matches!(result, Err(TillbookError::Validation(_))));
    }

    #[test]
    fn test_report_on_empty_store_has_zero_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = AnalyticsService::new(&storage, &settings);

        let bundle = service.build_weekly_report(date(2025, 3, 12)).unwrap();

        assert!(bundle.summary.total_income.is_zero());
        assert!(bundle.analytics.top_customers.is_empty());
        assert_eq!(bundle.analytics.booking_completion_rate, 0.0);
    }

    #[test]
    fn test_report_does_not_mutate_state() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let ledger = LedgerService::new(&storage);
        let service = AnalyticsService::new(&storage, &settings);

        add_completed_sale(&storage, 10000, date(2025, 3, 10));
        ledger.update_daily_balance(date(2025, 3, 10)).unwrap();

        let balances_before = storage.balances.count().unwrap();
        let sales_before = storage.sales.count().unwrap();

        service.build_weekly_report(date(2025, 3, 10)).unwrap();

        assert_eq!(storage.balances.count().unwrap(), balances_before);
        assert_eq!(storage.sales.count().unwrap(), sales_before);
    }

    #[test]
    fn test_top_customer_count_comes_from_settings() {
        let (_temp_dir, storage) = create_test_storage();
        let mut settings = Settings::default();
        settings.top_customer_count = 1;
        let service = AnalyticsService::new(&storage, &settings);

        add_completed_sale(&storage, 1000, date(2025, 3, 10));
        add_completed_sale(&storage, 2000, date(2025, 3, 10));

        let bundle = service.build_daily_report(date(2025, 3, 10)).unwrap();
        assert_eq!(bundle.analytics.top_customers.len(), 1);
        assert_eq!(bundle.analytics.top_customers[0].total_spend.cents(), 2000);
    }
}
