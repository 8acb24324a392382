//! Expense model
//!
//! A manually recorded cash outflow. Expenses are immutable once recorded:
//! there is no update or delete operation, only insertion and querying.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ExpenseId;
use super::money::Money;

/// A manually recorded outflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Amount spent (strictly positive)
    pub amount: Money,

    /// Identifier of the user who recorded the expense
    pub created_by: String,

    /// Calendar day the expense applies to
    pub expense_date: NaiveDate,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        created_by: impl Into<String>,
        expense_date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            created_by: created_by.into(),
            expense_date,
            created_at: Utc::now(),
        }
    }

    /// Validate the expense before it is persisted
    ///
    /// Rejects non-positive amounts and empty descriptions.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_positive() {
            return Err(format!(
                "expense amount must be positive, got {}",
                self.amount
            ));
        }
        if self.description.trim().is_empty() {
            return Err("expense description must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_expense() {
        let expense = Expense::new(
            "Cleaning supplies",
            Money::from_cents(1500),
            "admin",
            date(2025, 3, 10),
        );

        assert_eq!(expense.description, "Cleaning supplies");
        assert_eq!(expense.amount.cents(), 1500);
        assert_eq!(expense.created_by, "admin");
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let expense = Expense::new("Nothing", Money::zero(), "admin", date(2025, 3, 10));
        assert!(expense.validate().is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let expense = Expense::new(
            "Refund?",
            Money::from_cents(-500),
            "admin",
            date(2025, 3, 10),
        );
        assert!(expense.validate().is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let expense = Expense::new("   ", Money::from_cents(500), "admin", date(2025, 3, 10));
        assert!(expense.validate().is_err());
    }
}
