//! Sale model
//!
//! A row in the transactional sales store: one booking/sale per customer
//! visit, with the service rendered, the amount charged, and how much was
//! collected up front. The ledger and analytics layers only read these rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CustomerId, SaleId};
use super::money::Money;

/// Status of a sale/booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Booked but not yet fulfilled
    #[default]
    Booked,
    /// Service delivered and sale completed
    Completed,
    /// Booking cancelled; excluded from revenue and payment metrics
    Cancelled,
}

impl SaleStatus {
    /// Check if this sale counts toward income
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if this sale was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "Booked"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A sale/booking record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier
    pub id: SaleId,

    /// The customer the sale belongs to
    pub customer_id: CustomerId,

    /// Customer name (stored for display)
    #[serde(default)]
    pub customer_name: String,

    /// Service category (e.g. "haircut", "repair", "consult")
    pub service: String,

    /// Total amount charged for the sale
    pub amount: Money,

    /// Amount collected in advance at booking time
    #[serde(default)]
    pub advance_paid: Money,

    /// Booking/sale status
    #[serde(default)]
    pub status: SaleStatus,

    /// Calendar day of the sale
    pub sale_date: NaiveDate,

    /// When the record was created (tie-break timestamp for rankings)
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Create a new sale
    pub fn new(
        customer_id: CustomerId,
        service: impl Into<String>,
        amount: Money,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            id: SaleId::new(),
            customer_id,
            customer_name: String::new(),
            service: service.into(),
            amount,
            advance_paid: Money::zero(),
            status: SaleStatus::Booked,
            sale_date,
            created_at: Utc::now(),
        }
    }

    /// Create a sale with all common fields
    pub fn with_details(
        customer_id: CustomerId,
        customer_name: impl Into<String>,
        service: impl Into<String>,
        amount: Money,
        advance_paid: Money,
        status: SaleStatus,
        sale_date: NaiveDate,
    ) -> Self {
        let mut sale = Self::new(customer_id, service, amount, sale_date);
        sale.customer_name = customer_name.into();
        sale.advance_paid = advance_paid;
        sale.status = status;
        sale
    }

    /// Outstanding amount still owed by the customer
    pub fn balance_due(&self) -> Money {
        self.amount - self.advance_paid
    }

    /// Validate the sale before it is persisted
    pub fn validate(&self) -> Result<(), String> {
        if self.amount.is_negative() {
            return Err(format!("sale amount must not be negative, got {}", self.amount));
        }
        if self.advance_paid.is_negative() {
            return Err(format!(
                "advance paid must not be negative, got {}",
                self.advance_paid
            ));
        }
        if self.advance_paid > self.amount {
            return Err(format!(
                "advance paid {} exceeds sale amount {}",
                self.advance_paid, self.amount
            ));
        }
        if self.service.trim().is_empty() {
            return Err("service category must not be empty".to_string());
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
    fn test_new_sale_defaults() {
        let sale = Sale::new(
            CustomerId::new(),
            "haircut",
            Money::from_cents(3000),
            date(2025, 3, 10),
        );

        assert_eq!(sale.status, SaleStatus::Booked);
        assert!(sale.advance_paid.is_zero());
        assert_eq!(sale.balance_due().cents(), 3000);
        assert!(sale.validate().is_ok());
    }

    #[test]
    fn test_balance_due() {
        let sale = Sale::with_details(
            CustomerId::new(),
            "Dana",
            "color",
            Money::from_cents(8000),
            Money::from_cents(2000),
            SaleStatus::Booked,
            date(2025, 3, 12),
        );

        assert_eq!(sale.balance_due().cents(), 6000);
    }

    #[test]
    fn test_advance_exceeding_amount_rejected() {
        let sale = Sale::with_details(
            CustomerId::new(),
            "Dana",
            "color",
            Money::from_cents(1000),
            Money::from_cents(2000),
            SaleStatus::Booked,
            date(2025, 3, 12),
        );

        assert!(sale.validate().is_err());
    }

    #[test]
    fn test_status_predicates() {
        assert!(SaleStatus::Completed.is_completed());
        assert!(!SaleStatus::Booked.is_completed());
        assert!(SaleStatus::Cancelled.is_cancelled());
    }
}
