//! Reporting period representation
//!
//! The engine aggregates at exactly three grains: a single day, an ISO week
//! (Monday through Sunday), and a calendar month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reporting period at one of the supported grains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "grain", content = "value")]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// A single calendar day
    Daily { date: NaiveDate },

    /// ISO week period (Monday-Sunday, e.g. "2025-W03")
    Weekly { year: i32, week: u32 },

    /// Calendar month (e.g. "2025-01")
    Monthly { year: i32, month: u32 },
}

impl ReportPeriod {
    /// Create a daily period
    pub fn day_of(date: NaiveDate) -> Self {
        Self::Daily { date }
    }

    /// Create the ISO week period containing a date
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self::Weekly {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Create a calendar month period
    pub fn month_of(year: i32, month: u32) -> Self {
        Self::Monthly { year, month }
    }

    /// Get the start date of this period
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Daily { date } => *date,
            Self::Weekly { year, week } => NaiveDate::from_isoywd_opt(*year, *week, Weekday::Mon)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(*year, 1, 1).unwrap()),
            Self::Monthly { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(*year, 1, 1).unwrap()),
        }
    }

    /// Get the end date of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::Daily { date } => *date,
            Self::Weekly { year, week } => NaiveDate::from_isoywd_opt(*year, *week, Weekday::Sun)
                .unwrap_or_else(|| self.start_date() + Duration::days(6)),
            Self::Monthly { year, month } => {
                let next_month = if *month == 12 {
                    NaiveDate::from_ymd_opt(*year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(*year, *month + 1, 1)
                };
                next_month.unwrap() - Duration::days(1)
            }
        }
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - Daily: "2025-01-15"
    /// - Weekly: "2025-W03"
    /// - Monthly: "2025-01"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        // Weekly format contains a W
        if s.contains('W') {
            let parts: Vec<&str> = s.split("-W").collect();
            if parts.len() == 2 {
                let year: i32 = parts[0]
                    .parse()
                    .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
                let week: u32 = parts[1]
                    .parse()
                    .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
                if !(1..=53).contains(&week) {
                    return Err(PeriodParseError::InvalidWeek(week));
                }
                return Ok(Self::Weekly { year, week });
            }
        }

        // Full date (YYYY-MM-DD)
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Daily { date });
        }

        // Monthly format (YYYY-MM)
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() == 2 {
            let year: i32 = parts[0]
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let month: u32 = parts[1]
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

            if !(1..=12).contains(&month) {
                return Err(PeriodParseError::InvalidMonth(month));
            }

            return Ok(Self::Monthly { year, month });
        }

        Err(PeriodParseError::InvalidFormat(s.to_string()))
    }

    /// Short grain label used in filename hints
    pub fn grain_label(&self) -> &'static str {
        match self {
            Self::Daily { .. } => "daily",
            Self::Weekly { .. } => "weekly",
            Self::Monthly { .. } => "monthly",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Weekly { year, week } => write!(f, "{:04}-W{:02}", year, week),
            Self::Monthly { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl Ord for ReportPeriod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start_date().cmp(&other.start_date())
    }
}

impl PartialOrd for ReportPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidWeek(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            PeriodParseError::InvalidWeek(w) => write!(f, "Invalid week: {}", w),
        }
    }
}

impl std::error::Error for PeriodParseError {}
