//! Calculation logic for the workforce ledger.
//!
//! This module contains the pure rules the services build on: `HH:MM`
//! parsing and lateness classification, leave day counting, the KPI and
//! supervisor-rating bonus tiers, the performance penalty, and the monthly
//! salary that combines them.

use crate::error::LedgerError;

mod bonus_tiers;
mod clock_time;
mod leave_days;
mod monthly_salary;
mod penalty;

pub use bonus_tiers::{BonusResult, calculate_kpi_bonus, calculate_supervisor_bonus, find_tier};
pub use clock_time::{is_late, parse_clock_time};
pub use leave_days::count_leave_days;
pub use monthly_salary::{compute_monthly_salary, is_consistent};
pub use penalty::{PenaltyResult, calculate_penalty};

/// Error raised when a salary component does not fit in a `Decimal`.
pub(crate) fn salary_overflow(component: &str) -> LedgerError {
    LedgerError::validation(
        "base_salary",
        format!("{} overflows the supported salary range", component),
    )
}
