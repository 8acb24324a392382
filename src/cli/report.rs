//! Report CLI commands
//!
//! Implements CLI commands for building period reports and exporting them
//! for downstream renderers.

use clap::Subcommand;
use std::fs::File;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{TillbookError, TillbookResult};
use crate::reports::ReportBundle;
use crate::services::AnalyticsService;
use crate::storage::Storage;

use super::expense::parse_date_or_today;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Build the report for a single day
    Daily {
        /// Date (YYYY-MM-DD, defaults to today)
        date: Option<String>,
        /// Write the report as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build the report for the ISO week containing a date
    Weekly {
        /// Any date in the week (YYYY-MM-DD, defaults to today)
        date: Option<String>,
        /// Write the report as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build the report for a calendar month
    Monthly {
        /// Month (YYYY-MM, defaults to the current month)
        month: Option<String>,
        /// Write the report as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TillbookResult<()> {
    let analytics = AnalyticsService::new(storage, settings);

    let (bundle, csv) = match cmd {
        ReportCommands::Daily { date, csv } => {
            let date = parse_date_or_today(date.as_deref())?;
            (analytics.build_daily_report(date)?, csv)
        }
        ReportCommands::Weekly { date, csv } => {
            let date = parse_date_or_today(date.as_deref())?;
            (analytics.build_weekly_report(date)?, csv)
        }
        ReportCommands::Monthly { month, csv } => {
            let (year, month_num) = parse_month_or_current(month.as_deref())?;
            (analytics.build_monthly_report(year, month_num)?, csv)
        }
    };

    print!("{}", bundle.format_terminal());

    if let Some(path) = csv {
        write_csv(&bundle, &path)?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}

/// Write a report bundle as CSV
fn write_csv(bundle: &ReportBundle, path: &PathBuf) -> TillbookResult<()> {
    let mut file = File::create(path)
        .map_err(|e| TillbookError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    bundle.export_csv(&mut file)
}

/// Parse a YYYY-MM month argument, defaulting to the current month
fn parse_month_or_current(s: Option<&str>) -> TillbookResult<(i32, u32)> {
    use chrono::Datelike;

    match s {
        Some(s) => {
            let parts: Vec<&str> = s.trim().split('-').collect();
            if parts.len() != 2 {
                return Err(TillbookError::Validation(format!("Invalid month: {}", s)));
            }
            let year: i32 = parts[0]
                .parse()
                .map_err(|_| TillbookError::Validation(format!("Invalid month: {}", s)))?;
            let month: u32 = parts[1]
                .parse()
                .map_err(|_| TillbookError::Validation(format!("Invalid month: {}", s)))?;
            if !(1..=12).contains(&month) {
                return Err(TillbookError::Validation(format!("Invalid month: {}", s)));
            }
            Ok((year, month))
        }
        None => {
            let today = chrono::Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month_or_current(Some("2025-03")).unwrap(), (2025, 3));
        assert!(parse_month_or_current(Some("2025-13")).is_err());
        assert!(parse_month_or_current(Some("March")).is_err());
    }
}
