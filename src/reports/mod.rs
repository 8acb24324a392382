//! Report payloads for tillbook
//!
//! Derived structures consumed by rendering layers: the per-range ledger
//! summary, the analytics breakdown, and the combined per-period bundle.

pub mod analytics;
pub mod bundle;
pub mod summary;

pub use analytics::{
    AnalyticsReport, CustomerInsights, PaymentMetrics, ServiceRevenue, TopCustomer,
};
pub use bundle::ReportBundle;
pub use summary::PeriodSummary;
