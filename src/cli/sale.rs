//! Sale CLI commands
//!
//! Implements CLI commands for the sales store: adding bookings, listing a
//! range, and importing from CSV.

use chrono::{Datelike, Local};
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{TillbookError, TillbookResult};
use crate::models::{CustomerId, Money, Sale, SaleStatus};
use crate::services::ImportService;
use crate::storage::Storage;

use super::expense::{parse_date, parse_date_or_today};

/// Sale subcommands
#[derive(Subcommand)]
pub enum SaleCommands {
    /// Record a sale/booking
    Add {
        /// Customer name
        customer: String,
        /// Service category (e.g. "haircut")
        service: String,
        /// Total amount charged (e.g., "30" or "30.50")
        amount: String,
        /// Advance collected at booking time
        #[arg(short, long, default_value = "0")]
        advance: String,
        /// Status: booked, completed, or cancelled
        #[arg(short, long, default_value = "completed")]
        status: String,
        /// Sale date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List sales in a date range
    List {
        /// Start date (YYYY-MM-DD, defaults to the 1st of this month)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,
    },

    /// Import sales from a CSV file (date,customer,service,amount,advance,status)
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
}

/// Handle a sale command
pub fn handle_sale_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SaleCommands,
) -> TillbookResult<()> {
    match cmd {
        SaleCommands::Add {
            customer,
            service,
            amount,
            advance,
            status,
            date,
        } => {
            let amount = Money::parse(&amount)
                .map_err(|e| TillbookError::Validation(e.to_string()))?;
            let advance = Money::parse(&advance)
                .map_err(|e| TillbookError::Validation(e.to_string()))?;
            let status = parse_status(&status)?;
            let date = parse_date_or_today(date.as_deref())?;

            // Reuse the customer id when the name is already known
            let customer_id = storage
                .sales
                .find_customer_by_name(&customer)?
                .unwrap_or_else(CustomerId::new);

            let sale =
                Sale::with_details(customer_id, &customer, service, amount, advance, status, date);
            sale.validate().map_err(TillbookError::Validation)?;

            storage.sales.upsert(sale.clone())?;
            storage.sales.save()?;

            println!(
                "Recorded sale {}: {} for {} on {} ({})",
                sale.id,
                sale.amount.format_with_symbol(&settings.currency_symbol),
                sale.customer_name,
                sale.sale_date,
                sale.status
            );
        }
        SaleCommands::List { from, to } => {
            let today = Local::now().date_naive();
            let from = match from {
                Some(s) => parse_date(&s)?,
                None => today.with_day(1).unwrap_or(today),
            };
            let to = match to {
                Some(s) => parse_date(&s)?,
                None => today,
            };

            let sales = storage.sales.get_by_date_range(from, to)?;
            if sales.is_empty() {
                println!("No sales between {} and {}", from, to);
                return Ok(());
            }

            println!(
                "{:<12} {:<16} {:<12} {:>10} {:>10} {:<10}",
                "Date", "Customer", "Service", "Amount", "Advance", "Status"
            );
            println!("{}", "-".repeat(76));
            for sale in &sales {
                println!(
                    "{:<12} {:<16} {:<12} {:>10} {:>10} {:<10}",
                    sale.sale_date.to_string(),
                    sale.customer_name,
                    sale.service,
                    sale.amount.format_with_symbol(&settings.currency_symbol),
                    sale.advance_paid.format_with_symbol(&settings.currency_symbol),
                    sale.status.to_string()
                );
            }
        }
        SaleCommands::Import { file } => {
            let import = ImportService::new(storage);
            let summary = import.import_sales(&file)?;

            println!("Imported {} sales from {}", summary.imported, file.display());
            for (line, reason) in &summary.skipped {
                println!("  skipped line {}: {}", line, reason);
            }
        }
    }

    Ok(())
}

/// Parse a sale status argument
fn parse_status(s: &str) -> TillbookResult<SaleStatus> {
    match s.trim().to_lowercase().as_str() {
        "booked" => Ok(SaleStatus::Booked),
        "completed" => Ok(SaleStatus::Completed),
        "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
        other => Err(TillbookError::Validation(format!(
            "Invalid status: {} (expected booked, completed, or cancelled)",
            other
        ))),
    }
}
