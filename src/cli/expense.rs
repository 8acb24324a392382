//! Expense CLI commands
//!
//! Implements CLI commands for recording and reviewing manual expenses.

use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TillbookError, TillbookResult};
use crate::models::Money;
use crate::services::LedgerService;
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,
        /// Amount (e.g., "25" or "25.50")
        amount: String,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Who is recording the expense
        #[arg(short, long, default_value = "operator")]
        user: String,
    },

    /// List expenses in a date range
    List {
        /// Start date (YYYY-MM-DD, defaults to the 1st of this month)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show the expense total for the current ISO week
    Week,

    /// Show the expense total for the current calendar month
    Month,
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TillbookResult<()> {
    let ledger = LedgerService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            date,
            user,
        } => {
            let amount = Money::parse(&amount)
                .map_err(|e| TillbookError::Validation(e.to_string()))?;
            let date = parse_date_or_today(date.as_deref())?;

            let expense = ledger.record_expense(&description, amount, &user, date)?;
            println!(
                "Recorded expense {}: {} on {} ({})",
                expense.id,
                expense.amount.format_with_symbol(&settings.currency_symbol),
                expense.expense_date,
                expense.description
            );
        }
        ExpenseCommands::List { from, to } => {
            let today = Local::now().date_naive();
            let from = match from {
                Some(s) => parse_date(&s)?,
                None => today.with_day(1).unwrap_or(today),
            };
            let to = match to {
                Some(s) => parse_date(&s)?,
                None => today,
            };

            let expenses = ledger.expenses_for_range(from, to)?;
            if expenses.is_empty() {
                println!("No expenses between {} and {}", from, to);
                return Ok(());
            }

            println!("{:<12} {:<28} {:>12} {:<12}", "Date", "Description", "Amount", "By");
            println!("{}", "-".repeat(68));
            let mut total = Money::zero();
            for expense in &expenses {
                total += expense.amount;
                println!(
                    "{:<12} {:<28} {:>12} {:<12}",
                    expense.expense_date.to_string(),
                    expense.description,
                    expense.amount.format_with_symbol(&settings.currency_symbol),
                    expense.created_by
                );
            }
            println!("{}", "-".repeat(68));
            println!(
                "{:<41} {:>12}",
                "Total:",
                total.format_with_symbol(&settings.currency_symbol)
            );
        }
        ExpenseCommands::Week => {
            let total = ledger.expenses_for_week()?;
            println!(
                "Expenses this week: {}",
                total.format_with_symbol(&settings.currency_symbol)
            );
        }
        ExpenseCommands::Month => {
            let total = ledger.expenses_for_month()?;
            println!(
                "Expenses this month: {}",
                total.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(s: &str) -> TillbookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TillbookError::Validation(format!("Invalid date: {}", s)))
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn parse_date_or_today(s: Option<&str>) -> TillbookResult<NaiveDate> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
        assert!(parse_date("03/10/2025").is_err());
    }

    #[test]
    fn test_parse_date_or_today_defaults() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date_or_today(None).unwrap(), today);
    }
}
