//! Combined report payload
//!
//! One `ReportBundle` per reporting grain: the period it covers, the ledger
//! summary, and the derived analytics, with terminal and CSV renderings for
//! downstream consumers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{TillbookError, TillbookResult};
use crate::models::ReportPeriod;

use super::analytics::AnalyticsReport;
use super::summary::PeriodSummary;

/// The full report payload for one period
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    /// The reporting period
    pub period: ReportPeriod,
    /// First date covered (inclusive)
    pub start_date: NaiveDate,
    /// Last date covered (inclusive)
    pub end_date: NaiveDate,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Ledger summary for the period
    pub summary: PeriodSummary,
    /// Derived analytics for the period
    pub analytics: AnalyticsReport,
}

impl ReportBundle {
    /// Suggested base filename for renderers (no extension)
    pub fn filename_hint(&self) -> String {
        format!("{}-report-{}", self.period.grain_label(), self.period)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} Report: {} ({} to {})\n",
            capitalize(self.period.grain_label()),
            self.period,
            self.start_date,
            self.end_date
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        // Ledger summary
        output.push_str(&format!("Opening Balance:   {:>14}\n", self.summary.opening_balance));
        output.push_str(&format!("Total Income:      {:>14}\n", self.summary.total_income));
        output.push_str(&format!("Total Expenses:    {:>14}\n", self.summary.total_expenses));
        output.push_str(&format!("Net Balance:       {:>14}\n", self.summary.net_balance));
        output.push_str(&"-".repeat(35));
        output.push('\n');
        output.push_str(&format!("Closing Balance:   {:>14}\n", self.summary.closing_balance));
        output.push('\n');

        // Customers
        output.push_str(&format!(
            "Customers: {} total, {} new\n",
            self.analytics.customer_insights.total_customers,
            self.analytics.customer_insights.new_customers
        ));
        output.push_str(&format!(
            "Booking Completion: {:.0}%\n",
            self.analytics.booking_completion_rate * 100.0
        ));
        output.push_str(&format!(
            "Advance Received:  {:>14}\n",
            self.analytics.payment_metrics.advance_received
        ));
        output.push_str(&format!(
            "Balance Due:       {:>14}\n",
            self.analytics.payment_metrics.balance_due
        ));

        // Top customers
        if !self.analytics.top_customers.is_empty() {
            output.push_str(&format!(
                "\n{:<24} {:>12} {:>8}\n",
                "Top Customers", "Spend", "Visits"
            ));
            output.push_str(&"-".repeat(48));
            output.push('\n');
            for customer in &self.analytics.top_customers {
                let name = if customer.customer_name.is_empty() {
                    customer.customer_id.to_string()
                } else {
                    customer.customer_name.clone()
                };
                output.push_str(&format!(
                    "{:<24} {:>12} {:>8}\n",
                    name, customer.total_spend, customer.visits
                ));
            }
        }

        // Service revenue
        if !self.analytics.service_revenue.is_empty() {
            output.push_str(&format!("\n{:<24} {:>12}\n", "Service Revenue", "Revenue"));
            output.push_str(&"-".repeat(40));
            output.push('\n');
            for entry in &self.analytics.service_revenue {
                output.push_str(&format!("{:<24} {:>12}\n", entry.service, entry.revenue));
            }
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TillbookResult<()> {
        let mut w = csv::Writer::from_writer(writer);

        w.write_record(["Section", "Key", "Value"])
            .map_err(|e| TillbookError::Export(e.to_string()))?;

        let money = |m: crate::models::Money| format!("{:.2}", m.cents() as f64 / 100.0);

        let mut write_row = |section: &str, key: &str, value: String| {
            w.write_record([section, key, value.as_str()])
                .map_err(|e| TillbookError::Export(e.to_string()))
        };

        write_row("summary", "opening_balance", money(self.summary.opening_balance))?;
        write_row("summary", "total_income", money(self.summary.total_income))?;
        write_row("summary", "total_expenses", money(self.summary.total_expenses))?;
        write_row("summary", "net_balance", money(self.summary.net_balance))?;
        write_row("summary", "closing_balance", money(self.summary.closing_balance))?;

        write_row(
            "customers",
            "new",
            self.analytics.customer_insights.new_customers.to_string(),
        )?;
        write_row(
            "customers",
            "total",
            self.analytics.customer_insights.total_customers.to_string(),
        )?;
        write_row(
            "bookings",
            "completion_rate",
            format!("{:.4}", self.analytics.booking_completion_rate),
        )?;
        write_row(
            "payments",
            "advance_received",
            money(self.analytics.payment_metrics.advance_received),
        )?;
        write_row(
            "payments",
            "balance_due",
            money(self.analytics.payment_metrics.balance_due),
        )?;

        for customer in &self.analytics.top_customers {
            write_row(
                "top_customer",
                &customer.customer_name,
                money(customer.total_spend),
            )?;
        }
        for entry in &self.analytics.service_revenue {
            write_row("service_revenue", &entry.service, money(entry.revenue))?;
        }

        w.flush().map_err(|e| TillbookError::Export(e.to_string()))?;
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
