//! Storage layer for tillbook
//!
//! Provides JSON file storage with atomic writes, in-memory indexes, and
//! automatic directory creation. Daily balances and expenses are owned by
//! this layer; the sales store is the transactional source the ledger and
//! analytics layers read from.

pub mod balances;
pub mod expenses;
pub mod file_io;
pub mod sales;

pub use balances::BalanceRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use sales::SaleRepository;

use crate::config::paths::TillbookPaths;
use crate::error::TillbookError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TillbookPaths,
    pub balances: BalanceRepository,
    pub expenses: ExpenseRepository,
    pub sales: SaleRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TillbookPaths) -> Result<Self, TillbookError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            balances: BalanceRepository::new(paths.balances_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            sales: SaleRepository::new(paths.sales_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TillbookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TillbookError> {
        self.balances.load()?;
        self.expenses.load()?;
        self.sales.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TillbookError> {
        self.balances.save()?;
        self.expenses.save()?;
        self.sales.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has a settings file)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}
