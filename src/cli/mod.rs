//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod balance;
pub mod expense;
pub mod report;
pub mod sale;

pub use balance::{handle_balance_command, BalanceCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use report::{handle_report_command, ReportCommands};
pub use sale::{handle_sale_command, SaleCommands};
