//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json. Expenses are
//! append-only: there is no update or delete, matching the immutable
//! lifecycle of a recorded outflow.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::TillbookError;
use crate::models::{Expense, ExpenseId, Money};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a date index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: expense_date -> expense_ids
    by_date: RwLock<HashMap<NaiveDate, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_date: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the date index
    pub fn load(&self) -> Result<(), TillbookError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_date = self
            .by_date
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_date.clear();

        for expense in file_data.expenses {
            by_date.entry(expense.expense_date).or_default().push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| {
            a.expense_date
                .cmp(&b.expense_date)
                .then(a.created_at.cmp(&b.created_at))
        });

        let file_data = ExpenseData { expenses };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert a new expense
    ///
    /// Duplicate description/amount/date rows are distinct records and are
    /// all counted; there is no deduplication.
    pub fn insert(&self, expense: Expense) -> Result<(), TillbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_date = self
            .by_date
            .write()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        by_date.entry(expense.expense_date).or_default().push(expense.id);
        data.insert(expense.id, expense);
        Ok(())
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Sum of all expense amounts on a date, zero when none
    pub fn total_for_date(&self, date: NaiveDate) -> Result<Money, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_date = self
            .by_date
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_date.get(&date).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| data.get(id))
            .map(|e| e.amount)
            .sum())
    }

    /// Get expenses in a date range (inclusive), ordered by date then creation time
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.expense_date >= start && e.expense_date <= end)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| {
            a.expense_date
                .cmp(&b.expense_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(expenses)
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, TillbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| TillbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.total_for_date(date(2025, 3, 10)).unwrap().is_zero());
    }

    #[test]
    fn test_insert_and_total() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(Expense::new(
            "Supplies",
            Money::from_cents(1500),
            "admin",
            date(2025, 3, 10),
        ))
        .unwrap();
        repo.insert(Expense::new(
            "Lunch",
            Money::from_cents(800),
            "admin",
            date(2025, 3, 10),
        ))
        .unwrap();
        repo.insert(Expense::new(
            "Rent",
            Money::from_cents(50000),
            "admin",
            date(2025, 3, 11),
        ))
        .unwrap();

        assert_eq!(repo.total_for_date(date(2025, 3, 10)).unwrap().cents(), 2300);
        assert_eq!(repo.total_for_date(date(2025, 3, 11)).unwrap().cents(), 50000);
    }

    #[test]
    fn test_identical_expenses_both_counted() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        for _ in 0..2 {
            repo.insert(Expense::new(
                "Coffee",
                Money::from_cents(300),
                "admin",
                date(2025, 3, 10),
            ))
            .unwrap();
        }

        assert_eq!(repo.total_for_date(date(2025, 3, 10)).unwrap().cents(), 600);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_date_range_query_ordered() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(Expense::new(
            "Later",
            Money::from_cents(100),
            "admin",
            date(2025, 3, 12),
        ))
        .unwrap();
        repo.insert(Expense::new(
            "Earlier",
            Money::from_cents(200),
            "admin",
            date(2025, 3, 10),
        ))
        .unwrap();

        let range = repo
            .get_by_date_range(date(2025, 3, 10), date(2025, 3, 12))
            .unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range[0].description, "Earlier");
        assert_eq!(range[1].description, "Later");

        let partial = repo
            .get_by_date_range(date(2025, 3, 11), date(2025, 3, 12))
            .unwrap();
        assert_eq!(partial.len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = Expense::new("Supplies", Money::from_cents(1500), "admin", date(2025, 3, 10));
        let id = expense.id;
        repo.insert(expense).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("expenses.json");
        let repo2 = ExpenseRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let reloaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(reloaded.amount.cents(), 1500);
    }
}
