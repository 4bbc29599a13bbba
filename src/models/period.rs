//! Monthly period model.
//!
//! KPI records, monthly evaluations and salary history are all keyed by a
//! calendar month. [`Period`] validates that key once so the rest of the
//! ledger can rely on it.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// A calendar month in a given year.
///
/// Ordering is chronological (year first, then month).
///
/// # Example
///
/// ```
/// use workforce_ledger::models::Period;
///
/// let march = Period::new(3, 2025).unwrap();
/// assert_eq!(march.to_string(), "2025-03");
/// assert!(Period::new(13, 2025).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// The year.
    pub year: i32,
    /// The month, 1 through 12.
    pub month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1..=12 and years that
    /// chrono cannot represent.
    pub fn new(month: u32, year: i32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(
                "month",
                format!("must be between 1 and 12, got {}", month),
            ));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::validation(
                "year",
                format!("{} is out of range", year),
            ));
        }
        Ok(Self { year, month })
    }

    /// The period a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns true if the date falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
