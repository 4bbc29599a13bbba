//! Leave day counting.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{LedgerError, LedgerResult};

/// Counts the days a leave request spans, both ends inclusive.
///
/// With `exclude_weekends` only Monday through Friday are counted, so a
/// request covering just a weekend counts zero days.
///
/// # Errors
///
/// Returns a [`LedgerError::Validation`] when `end` is before `start`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use workforce_ledger::calculation::count_leave_days;
///
/// // Friday 2025-05-02 through Monday 2025-05-05
/// let start = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
///
/// assert_eq!(count_leave_days(start, end, false).unwrap(), 4);
/// assert_eq!(count_leave_days(start, end, true).unwrap(), 2);
/// ```
pub fn count_leave_days(start: NaiveDate, end: NaiveDate, exclude_weekends: bool) -> LedgerResult<i32> {
    if end < start {
        return Err(LedgerError::validation(
            "end_date",
            format!("{} is before start date {}", end, start),
        ));
    }

    let days = if exclude_weekends {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .count() as i64
    } else {
        (end - start).num_days() + 1
    };

    i32::try_from(days).map_err(|_| LedgerError::validation("end_date", "leave span is too long"))
}
