//! Analytics report
//!
//! The insight half of a report: customer acquisition, top customers by
//! spend, revenue by service category, booking completion, and payment
//! metrics. Built strictly from read-only queries over the sales store;
//! absent data degrades each field to its zero/empty value.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::TillbookResult;
use crate::models::{CustomerId, Money};
use crate::storage::Storage;

/// Customer acquisition counts for a range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomerInsights {
    /// Customers whose first-ever sale falls within the range
    pub new_customers: usize,
    /// Distinct customers with a sale in the range
    pub total_customers: usize,
}

/// One entry in the top-customer ranking
#[derive(Debug, Clone, Serialize)]
pub struct TopCustomer {
    pub customer_id: CustomerId,
    pub customer_name: String,
    /// Completed-sale spend within the range
    pub total_spend: Money,
    /// Number of completed sales within the range
    pub visits: usize,
}

/// Revenue for one service category
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRevenue {
    pub service: String,
    pub revenue: Money,
}

/// Advance collected vs balance still owed over a range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentMetrics {
    /// Sum of advances collected on non-cancelled sales
    pub advance_received: Money,
    /// Sum of outstanding balances on non-cancelled sales
    pub balance_due: Money,
}

/// Derived analytics for a date range
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub customer_insights: CustomerInsights,
    /// Ordered descending by spend; ties broken by earliest sale time, then id
    pub top_customers: Vec<TopCustomer>,
    /// Ordered descending by revenue; ties broken by category name
    pub service_revenue: Vec<ServiceRevenue>,
    pub payment_metrics: PaymentMetrics,
    /// completed / total bookings in range, 0.0 when there are none
    pub booking_completion_rate: f64,
}

impl AnalyticsReport {
    /// Generate analytics for an inclusive date range
    ///
    /// `top_n` bounds the top-customer ranking. Every field is always
    /// present: a range with no sales produces zero counts, empty lists,
    /// and a 0.0 completion rate rather than an error.
    pub fn generate(
        storage: &Storage,
        start: NaiveDate,
        end: NaiveDate,
        top_n: usize,
    ) -> TillbookResult<Self> {
        let sales = storage.sales.get_by_date_range(start, end)?;

        // Customer acquisition
        let in_range = storage.sales.distinct_customers(start, end)?;
        let mut new_customers = 0;
        for customer_id in &in_range {
            if let Some(first) = storage.sales.first_sale_date(*customer_id)? {
                if first >= start && first <= end {
                    new_customers += 1;
                }
            }
        }
        let customer_insights = CustomerInsights {
            new_customers,
            total_customers: in_range.len(),
        };

        // Top customers by completed-sale spend
        struct Spend {
            name: String,
            total: Money,
            visits: usize,
            earliest: DateTime<Utc>,
        }
        let mut spend_by_customer: HashMap<CustomerId, Spend> = HashMap::new();
        for sale in sales.iter().filter(|s| s.status.is_completed()) {
            let entry = spend_by_customer
                .entry(sale.customer_id)
                .or_insert_with(|| Spend {
                    name: sale.customer_name.clone(),
                    total: Money::zero(),
                    visits: 0,
                    earliest: sale.created_at,
                });
            entry.total += sale.amount;
            entry.visits += 1;
            if sale.created_at < entry.earliest {
                entry.earliest = sale.created_at;
            }
        }
        let mut ranked: Vec<_> = spend_by_customer.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            b.total
                .cmp(&a.total)
                .then(a.earliest.cmp(&b.earliest))
                .then(a_id.cmp(b_id))
        });
        let top_customers: Vec<TopCustomer> = ranked
            .into_iter()
            .take(top_n)
            .map(|(customer_id, spend)| TopCustomer {
                customer_id,
                customer_name: spend.name,
                total_spend: spend.total,
                visits: spend.visits,
            })
            .collect();

        // Revenue by service category
        let mut revenue_by_service: HashMap<String, Money> = HashMap::new();
        for sale in sales.iter().filter(|s| s.status.is_completed()) {
            *revenue_by_service
                .entry(sale.service.clone())
                .or_insert_with(Money::zero) += sale.amount;
        }
        let mut service_revenue: Vec<ServiceRevenue> = revenue_by_service
            .into_iter()
            .map(|(service, revenue)| ServiceRevenue { service, revenue })
            .collect();
        service_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.service.cmp(&b.service)));

        // Payment metrics over non-cancelled sales
        let mut payment_metrics = PaymentMetrics::default();
        for sale in sales.iter().filter(|s| !s.status.is_cancelled()) {
            payment_metrics.advance_received += sale.advance_paid;
            payment_metrics.balance_due += sale.balance_due();
        }

        // Completion rate over all bookings in range
        let total = sales.len();
        let completed = sales.iter().filter(|s| s.status.is_completed()).count();
        let booking_completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };

        Ok(Self {
            customer_insights,
            top_customers,
            service_revenue,
            payment_metrics,
            booking_completion_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TillbookPaths;
    use crate::models::{Sale, SaleStatus};
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

    fn sale(
        customer: CustomerId,
        name: &str,
        service: &str,
        cents: i64,
        advance: i64,
        status: SaleStatus,
        d: NaiveDate,
    ) -> Sale {
        Sale::with_details(
            customer,
            name,
            service,
            Money::from_cents(cents),
            Money::from_cents(advance),
            status,
            d,
        )
    }

    #[test]
    fn test_empty_range_degrades_to_zero_values() {
        let (_temp_dir, storage) = create_test_storage();

        let report =
            AnalyticsReport::generate(&storage, date(2025, 3, 10), date(2025, 3, 16), 5).unwrap();

        assert_eq!(report.customer_insights, CustomerInsights::default());
        assert!(report.top_customers.is_empty());
        assert!(report.service_revenue.is_empty());
        assert_eq!(report.payment_metrics, PaymentMetrics::default());
        assert_eq!(report.booking_completion_rate, 0.0);
    }

    #[test]
    fn test_new_vs_returning_customers() {
        let (_temp_dir, storage) = create_test_storage();

        let regular = CustomerId::new();
        let newcomer = CustomerId::new();

        // Regular's first visit predates the range
        storage
            .sales
            .upsert(sale(regular, "Regular", "haircut", 3000, 0, SaleStatus::Completed, date(2025, 2, 20)))
            .unwrap();
        storage
            .sales
            .upsert(sale(regular, "Regular", "haircut", 3000, 0, SaleStatus::Completed, date(2025, 3, 11)))
            .unwrap();
        storage
            .sales
            .upsert(sale(newcomer, "Newcomer", "color", 8000, 0, SaleStatus::Completed, date(2025, 3, 12)))
            .unwrap();

        let report =
            AnalyticsReport::generate(&storage, date(2025, 3, 10), date(2025, 3, 16), 5).unwrap();

        assert_eq!(report.customer_insights.total_customers, 2);
        assert_eq!(report.customer_insights.new_customers, 1);
    }

    #[test]
    fn test_top_customers_ordered_by_spend() {
        let (_temp_dir, storage) = create_test_storage();

        let big = CustomerId::new();
        let small = CustomerId::new();
        let d = date(2025, 3, 10);

        storage
            .sales
            .upsert(sale(small, "Small", "trim", 2000, 0, SaleStatus::Completed, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(big, "Big", "color", 6000, 0, SaleStatus::Completed, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(big, "Big", "haircut", 3000, 0, SaleStatus::Completed, d))
            .unwrap();

        let report = AnalyticsReport::generate(&storage, d, d, 5).unwrap();

        assert_eq!(report.top_customers.len(), 2);
        assert_eq!(report.top_customers[0].customer_name, "Big");
        assert_eq!(report.top_customers[0].total_spend.cents(), 9000);
        assert_eq!(report.top_customers[0].visits, 2);
        assert_eq!(report.top_customers[1].customer_name, "Small");
    }

    #[test]
    fn test_top_customers_tie_break_is_deterministic() {
        let (_temp_dir, storage) = create_test_storage();
        let d = date(2025, 3, 10);

        // Same spend; earlier created_at wins
        let first = CustomerId::new();
        let later = CustomerId::new();

        let mut early_sale = sale(first, "First", "haircut", 5000, 0, SaleStatus::Completed, d);
        early_sale.created_at = Utc::now() - chrono::Duration::hours(2);
        storage.sales.upsert(early_sale).unwrap();
        storage
            .sales
            .upsert(sale(later, "Later", "haircut", 5000, 0, SaleStatus::Completed, d))
            .unwrap();

        for _ in 0..3 {
            let report = AnalyticsReport::generate(&storage, d, d, 5).unwrap();
            assert_eq!(report.top_customers[0].customer_name, "First");
            assert_eq!(report.top_customers[1].customer_name, "Later");
        }
    }

    #[test]
    fn test_top_n_truncation() {
        let (_temp_dir, storage) = create_test_storage();
        let d = date(2025, 3, 10);

        for i in 1..=4 {
            storage
                .sales
                .upsert(sale(
                    CustomerId::new(),
                    "Customer",
                    "haircut",
                    1000 * i,
                    0,
                    SaleStatus::Completed,
                    d,
                ))
                .unwrap();
        }

        let report = AnalyticsReport::generate(&storage, d, d, 2).unwrap();
        assert_eq!(report.top_customers.len(), 2);
        assert_eq!(report.top_customers[0].total_spend.cents(), 4000);
    }

    #[test]
    fn test_service_revenue_sorted_descending() {
        let (_temp_dir, storage) = create_test_storage();
        let d = date(2025, 3, 10);
        let customer = CustomerId::new();

        storage
            .sales
            .upsert(sale(customer, "A", "trim", 2000, 0, SaleStatus::Completed, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "color", 8000, 0, SaleStatus::Completed, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "color", 1000, 0, SaleStatus::Completed, d))
            .unwrap();
        // Cancelled revenue never counts
        storage
            .sales
            .upsert(sale(customer, "A", "spa", 9999, 0, SaleStatus::Cancelled, d))
            .unwrap();

        let report = AnalyticsReport::generate(&storage, d, d, 5).unwrap();

        assert_eq!(report.service_revenue.len(), 2);
        assert_eq!(report.service_revenue[0].service, "color");
        assert_eq!(report.service_revenue[0].revenue.cents(), 9000);
        assert_eq!(report.service_revenue[1].service, "trim");
    }

    #[test]
    fn test_completion_rate_bounds() {
        let (_temp_dir, storage) = create_test_storage();
        let d = date(2025, 3, 10);
        let customer = CustomerId::new();

        storage
            .sales
            .upsert(sale(customer, "A", "haircut", 1000, 0, SaleStatus::Completed, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "haircut", 1000, 0, SaleStatus::Booked, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "haircut", 1000, 0, SaleStatus::Cancelled, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "haircut", 1000, 0, SaleStatus::Completed, d))
            .unwrap();

        let report = AnalyticsReport::generate(&storage, d, d, 5).unwrap();
        assert!((report.booking_completion_rate - 0.5).abs() < f64::EPSILON);
        assert!(report.booking_completion_rate >= 0.0);
        assert!(report.booking_completion_rate <= 1.0);
    }

    #[test]
    fn test_payment_metrics() {
        let (_temp_dir, storage) = create_test_storage();
        let d = date(2025, 3, 10);
        let customer = CustomerId::new();

        storage
            .sales
            .upsert(sale(customer, "A", "color", 8000, 3000, SaleStatus::Booked, d))
            .unwrap();
        storage
            .sales
            .upsert(sale(customer, "A", "haircut", 2000, 2000, SaleStatus::Completed, d))
            .unwrap();
        // Cancelled bookings are excluded entirely
        storage
            .sales
            .upsert(sale(customer, "A", "spa", 5000, 1000, SaleStatus::Cancelled, d))
            .unwrap();

        let report = AnalyticsReport::generate(&storage, d, d, 5).unwrap();

        assert_eq!(report.payment_metrics.advance_received.cents(), 5000);
        assert_eq!(report.payment_metrics.balance_due.cents(), 5000);
    }
}
