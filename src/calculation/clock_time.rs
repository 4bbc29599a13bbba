//! Clock time parsing and lateness classification.
//!
//! Attendance times arrive from the presentation layer as `HH:MM` strings.
//! This module normalizes them into [`NaiveTime`] and decides lateness.

use chrono::NaiveTime;

use crate::error::{LedgerError, LedgerResult};

/// Parses a 24-hour `HH:MM` string.
///
/// Surrounding whitespace is ignored and a single-digit hour ("8:05") is
/// accepted. Anything else is a [`LedgerError::Validation`] naming `field`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use workforce_ledger::calculation::parse_clock_time;
///
/// let time = parse_clock_time("clock_in", "08:31").unwrap();
/// assert_eq!(time, NaiveTime::from_hms_opt(8, 31, 0).unwrap());
///
/// assert!(parse_clock_time("clock_in", "25:00").is_err());
/// assert!(parse_clock_time("clock_in", "08:30:15").is_err());
/// ```
pub fn parse_clock_time(field: &str, raw: &str) -> LedgerResult<NaiveTime> {
    let trimmed = raw.trim();

    let invalid = || {
        LedgerError::validation(field, format!("expected a HH:MM time, got '{}'", raw))
    };

    // chrono also takes one-digit minutes and inner spaces.
    let bytes = trimmed.as_bytes();
    if !(4..=5).contains(&bytes.len())
        || bytes[bytes.len() - 3] != b':'
        || bytes.iter().filter(|b| b.is_ascii_digit()).count() != bytes.len() - 1
    {
        return Err(invalid());
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| invalid())
}

/// Returns true when `clock_in` is strictly after `late_after`.
///
/// Arriving exactly at the threshold is on time.
///
/// ```
/// use chrono::NaiveTime;
/// use workforce_ledger::calculation::is_late;
///
/// let threshold = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
/// assert!(!is_late(NaiveTime::from_hms_opt(8, 30, 0).unwrap(), threshold));
/// assert!(is_late(NaiveTime::from_hms_opt(8, 31, 0).unwrap(), threshold));
/// ```
pub fn is_late(clock_in: NaiveTime, late_after: NaiveTime) -> bool {
    clock_in > late_after
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_valid_times() {
        assert_eq!(parse_clock_time("t", "00:00").unwrap(), time(0, 0));
        assert_eq!(parse_clock_time("t", "23:59").unwrap(), time(23, 59));
        assert_eq!(parse_clock_time("t", " 8:05 ").unwrap(), time(8, 5));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for raw in [
            "", "0830", "8", "08:3", "08:300", "ab:cd", "-1:30", "24:00", "12:60", "08:30:00",
            "8am", "8.30am", "08: 5", "1:2:3", "٠٨:٣٠",
        ] {
            match parse_clock_time("clock_in", raw) {
                Err(LedgerError::Validation { field, message }) => {
                    assert_eq!(field, "clock_in");
                    assert!(message.contains("HH:MM"), "message was {}", message);
                }
                other => panic!("Expected Validation error for '{}', got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_lateness_boundary() {
        let threshold = time(8, 30);
        assert!(!is_late(time(8, 0), threshold));
        assert!(!is_late(time(8, 30), threshold));
        assert!(is_late(time(8, 31), threshold));
        assert!(is_late(time(13, 0), threshold));
    }
}
