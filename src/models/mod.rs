//! Core data models for tillbook
//!
//! This module contains all the data structures that represent the ledger
//! domain: money, daily balances, expenses, sales, and reporting periods.

pub mod balance;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;
pub mod sale;

pub use balance::DailyBalance;
pub use expense::Expense;
pub use ids::{CustomerId, ExpenseId, SaleId};
pub use money::Money;
pub use period::ReportPeriod;
pub use sale::{Sale, SaleStatus};
