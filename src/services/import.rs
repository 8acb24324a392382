//! CSV import service
//!
//! Imports sales rows from CSV files into the sales store so the ledger and
//! analytics layers have transactional data to aggregate. Expected columns:
//! `date,customer,service,amount,advance,status` with a header row.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{TillbookError, TillbookResult};
use crate::models::{CustomerId, Money, Sale, SaleStatus};
use crate::storage::Storage;

/// Result of a CSV import run
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Rows successfully imported
    pub imported: usize,
    /// Rows skipped with their line numbers and reasons
    pub skipped: Vec<(usize, String)>,
}

/// Service for importing sales from CSV
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import sales from a CSV file
    ///
    /// Customer identity is keyed by the customer name column: rows sharing
    /// a name within one import run map to the same customer id. Malformed
    /// rows are skipped (and reported), not fatal.
    pub fn import_sales(&self, path: &Path) -> TillbookResult<ImportSummary> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| TillbookError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

        let mut summary = ImportSummary::default();
        let mut customers_by_name: HashMap<String, CustomerId> = HashMap::new();

        for (index, record) in reader.records().enumerate() {
            // Line 1 is the header
            let line = index + 2;

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    summary.skipped.push((line, format!("unreadable row: {}", e)));
                    continue;
                }
            };

            match parse_row(&record, &mut customers_by_name) {
                Ok(sale) => {
                    self.storage.sales.upsert(sale)?;
                    summary.imported += 1;
                }
                Err(reason) => {
                    warn!(line, "skipping sale row: {reason}");
                    summary.skipped.push((line, reason));
                }
            }
        }

        self.storage.sales.save()?;
        Ok(summary)
    }
}

/// Parse one CSV record into a sale
fn parse_row(
    record: &csv::StringRecord,
    customers_by_name: &mut HashMap<String, CustomerId>,
) -> Result<Sale, String> {
    if record.len() < 6 {
        return Err(format!("expected 6 columns, got {}", record.len()));
    }

    let date = NaiveDate::parse_from_str(record[0].trim(), "%Y-%m-%d")
        .map_err(|e| format!("bad date '{}': {}", &record[0], e))?;

    let customer_name = record[1].trim().to_string();
    if customer_name.is_empty() {
        return Err("empty customer name".to_string());
    }
    let customer_id = *customers_by_name
        .entry(customer_name.clone())
        .or_insert_with(CustomerId::new);

    let service = record[2].trim().to_string();

    let amount =
        Money::parse(record[3].trim()).map_err(|e| format!("bad amount: {}", e))?;
    let advance =
        Money::parse(record[4].trim()).map_err(|e| format!("bad advance: {}", e))?;

    let status = match record[5].trim().to_lowercase().as_str() {
        "booked" => SaleStatus::Booked,
        "completed" => SaleStatus::Completed,
        "cancelled" | "canceled" => SaleStatus::Cancelled,
        other => return Err(format!("unknown status '{}'", other)),
    };

    let sale = Sale::with_details(customer_id, customer_name, service, amount, advance, status, date);
    sale.validate()?;
    Ok(sale)
}
