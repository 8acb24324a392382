//! Sale repository for JSON storage
//!
//! The transactional sales store the ledger and analytics layers read from.
//! Rows are written by the sale CLI commands and the CSV importer; the
//! ledger itself never mutates them.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::TillbookError;
use crate::models::{CustomerId, Money, Sale, SaleId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable sale data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SaleData {
    sales: Vec<Sale>,
}

/// Repository for the sales/bookings store with a customer index
pub struct SaleRepository {
    path: PathBuf,
    data: RwLock<HashMap<SaleId, Sale>>,
    /// Index: customer_id -> sale_ids
    by_customer: RwLock<HashMap<CustomerId, Vec<SaleId>>>,
}

impl SaleRepository {
    /// Create a new sale repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_customer: RwLock::new(HashMap::new()),
        }
    }

    /// Load sales from disk and build indexes
    pub fn load(&self) -> Result<(), TillbookError> {
        let file_data: SaleData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_customer = self
            .by_customer
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_customer.clear();

        for sale in file_data.sales {
            by_customer.entry(sale.customer_id).or_default().push(sale.id);
            data.insert(sale.id, sale);
        }

        Ok(())
    }

    /// Save sales to disk
    pub fn save(&self) -> Result<(), TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut sales: Vec<_> = data.values().cloned().collect();
        sales.sort_by(|a, b| a.sale_date.cmp(&b.sale_date).then(a.created_at.cmp(&b.created_at)));

        let file_data = SaleData { sales };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert or update a sale
    pub fn upsert(&self, sale: Sale) -> Result<(), TillbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_customer = self
            .by_customer
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from the old index entry if updating
        if let Some(old) = data.get(&sale.id) {
            if let Some(ids) = by_customer.get_mut(&old.customer_id) {
                ids.retain(|&id| id != sale.id);
            }
        }

        by_customer.entry(sale.customer_id).or_default().push(sale.id);
        data.insert(sale.id, sale);
        Ok(())
    }

    /// Get a sale by ID
    pub fn get(&self, id: SaleId) -> Result<Option<Sale>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Sum of completed sale amounts on a date
    pub fn sum_completed(&self, date: NaiveDate) -> Result<Money, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|s| s.sale_date == date && s.status.is_completed())
            .map(|s| s.amount)
            .sum())
    }

    /// Get sales in a date range (inclusive), ordered by date then creation time
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Sale>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut sales: Vec<_> = data
            .values()
            .filter(|s| s.sale_date >= start && s.sale_date <= end)
            .cloned()
            .collect();
        sales.sort_by(|a, b| a.sale_date.cmp(&b.sale_date).then(a.created_at.cmp(&b.created_at)));
        Ok(sales)
    }

    /// Date of a customer's first non-cancelled sale, across the whole store
    pub fn first_sale_date(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<NaiveDate>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_customer = self
            .by_customer
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_customer.get(&customer_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| data.get(id))
            .filter(|s| !s.status.is_cancelled())
            .map(|s| s.sale_date)
            .min())
    }

    /// Distinct customers with a non-cancelled sale in a date range
    pub fn distinct_customers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<CustomerId>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|s| {
                s.sale_date >= start && s.sale_date <= end && !s.status.is_cancelled()
            })
            .map(|s| s.customer_id)
            .collect())
    }

    /// Find an existing customer id by exact customer name
    pub fn find_customer_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CustomerId>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|s| s.customer_name == name)
            .map(|s| s.customer_id))
    }

    /// Count sales
    pub fn count(&self) -> Result<usize, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
