//! Balance CLI commands
//!
//! Implements CLI commands for recomputing and inspecting daily balances.

use chrono::Duration;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TillbookError, TillbookResult};
use crate::services::LedgerService;
use crate::storage::Storage;

use super::expense::{parse_date, parse_date_or_today};

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Recompute the daily balance for a date
    Update {
        /// Date to recompute (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Recompute daily balances for a date range, oldest first
    Backfill {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Show the stored balance for a date
    Show {
        /// Date to show (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Handle a balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BalanceCommands,
) -> TillbookResult<()> {
    let ledger = LedgerService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        BalanceCommands::Update { date } => {
            let date = parse_date_or_today(date.as_deref())?;
            let balance = ledger.update_daily_balance(date)?;
            println!(
                "Balance for {}: opening {}, income {}, expenses {}, closing {}",
                balance.date,
                balance.opening_balance.format_with_symbol(symbol),
                balance.total_income.format_with_symbol(symbol),
                balance.total_expenses.format_with_symbol(symbol),
                balance.closing_balance.format_with_symbol(symbol)
            );
        }
        BalanceCommands::Backfill { from, to } => {
            let from = parse_date(&from)?;
            let to = parse_date(&to)?;
            if from > to {
                return Err(TillbookError::Validation(format!(
                    "start {} is after end {}",
                    from, to
                )));
            }

            // Ascending order so each day carries its predecessor forward
            let mut date = from;
            let mut updated = 0;
            while date <= to {
                ledger.update_daily_balance(date)?;
                updated += 1;
                date += Duration::days(1);
            }
            println!("Recomputed {} daily balances ({} to {})", updated, from, to);
        }
        BalanceCommands::Show { date } => {
            let date = parse_date_or_today(date.as_deref())?;
            match storage.balances.get(date)? {
                Some(balance) => {
                    println!("Balance for {}", balance.date);
                    println!("  Opening:  {:>12}", balance.opening_balance.format_with_symbol(symbol));
                    println!("  Income:   {:>12}", balance.total_income.format_with_symbol(symbol));
                    println!("  Expenses: {:>12}", balance.total_expenses.format_with_symbol(symbol));
                    println!("  Closing:  {:>12}", balance.closing_balance.format_with_symbol(symbol));
                }
                None => {
                    let opening = ledger.opening_balance(date)?;
                    println!(
                        "No stored balance for {} (carry-forward opening would be {})",
                        date,
                        opening.format_with_symbol(symbol)
                    );
                }
            }
        }
    }

    Ok(())
}
