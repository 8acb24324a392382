//! Daily balance repository for JSON storage
//!
//! Manages loading and saving daily balance snapshots to balances.json.
//! Balances are keyed by calendar date; the map is ordered so carry-forward
//! lookups ("most recent record before this date") are a range scan.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::error::TillbookError;
use crate::models::{DailyBalance, Money};

use super::file_io::{read_json, write_json_atomic};

/// Serializable balance data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BalanceData {
    balances: Vec<DailyBalance>,
}

/// Repository for daily balance persistence
///
/// Recomputation (`recompute`) performs the whole read-modify-write under the
/// writer lock, which serializes concurrent updates for the same date.
pub struct BalanceRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<NaiveDate, DailyBalance>>,
}

impl BalanceRepository {
    /// Create a new balance repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load balances from disk
    pub fn load(&self) -> Result<(), TillbookError> {
        let file_data: BalanceData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for balance in file_data.balances {
            data.insert(balance.date, balance);
        }

        Ok(())
    }

    /// Save balances to disk
    pub fn save(&self) -> Result<(), TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        // BTreeMap iteration is already date-ordered
        let balances: Vec<_> = data.values().copied().collect();

        let file_data = BalanceData { balances };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get the balance for a date
    pub fn get(&self, date: NaiveDate) -> Result<Option<DailyBalance>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&date).copied())
    }

    /// Get the most recent balance strictly before a date
    pub fn latest_before(&self, date: NaiveDate) -> Result<Option<DailyBalance>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.range(..date).next_back().map(|(_, b)| *b))
    }

    /// Get all balances in a date range (inclusive), in date order
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBalance>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.range(start..=end).map(|(_, b)| *b).collect())
    }

    /// Recompute and upsert the balance for a date
    ///
    /// Carries the opening balance forward from the most recent record before
    /// `date` (zero when there is none). Holds the writer lock across the
    /// lookup and the insert so concurrent recomputes for the same date
    /// serialize instead of reading a stale opening value. Idempotent: the
    /// same inputs always produce the same stored row.
    pub fn recompute(
        &self,
        date: NaiveDate,
        total_income: Money,
        total_expenses: Money,
    ) -> Result<DailyBalance, TillbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let prior = data.range(..date).next_back().map(|(_, b)| *b);

        let opening = match prior {
            Some(prev) => {
                if prev.date != date - Duration::days(1) {
                    warn!(
                        date = %date,
                        prior_date = %prev.date,
                        "no balance for the preceding day, carrying forward from most recent record"
                    );
                }
                prev.closing_balance
            }
            None => {
                if !data.is_empty() {
                    warn!(date = %date, "no balance before this date, opening defaults to zero");
                }
                Money::zero()
            }
        };

        let balance = DailyBalance::compute(date, opening, total_income, total_expenses);
        data.insert(date, balance);

        Ok(balance)
    }

    /// Count stored balances
    pub fn count(&self) -> Result<usize, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
