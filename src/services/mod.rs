//! Business logic layer for tillbook
//!
//! Services bridge the CLI and report layers to the storage repositories:
//! the ledger owns balances and expenses, the analytics service builds the
//! period reports, and the import service seeds the sales store.

pub mod analytics;
pub mod import;
pub mod ledger;

pub use analytics::AnalyticsService;
pub use import::{ImportService, ImportSummary};
pub use ledger::LedgerService;
