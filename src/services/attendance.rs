//! Attendance tracking: one record per employee per day.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{is_late, parse_clock_time};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AttendanceRecord, AttendanceStatus, AttendanceSummary, Period};

use super::{EmployeeRegistry, LedgerContext};

/// Records clock-in/out and classifies lateness.
#[derive(Clone)]
pub struct AttendanceTracker {
    context: LedgerContext,
    registry: EmployeeRegistry,
}

impl AttendanceTracker {
    pub(crate) fn new(context: LedgerContext, registry: EmployeeRegistry) -> Self {
        Self { context, registry }
    }

    /// Opens the day's record for `employee_id`.
    ///
    /// `time` is `HH:MM`. The record is late when the clock-in is strictly
    /// after the configured threshold. A second clock-in on the same day is
    /// a duplicate.
    pub fn clock_in(
        &self,
        employee_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> LedgerResult<AttendanceRecord> {
        let clock_in = parse_clock_time("clock_in", time)?;
        self.registry.get(employee_id)?;

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            date,
            clock_in: Some(clock_in),
            clock_out: None,
            status: AttendanceStatus::Present,
            is_late: is_late(clock_in, self.context.config().late_after()),
        };
        self.context.store().insert_attendance(record.clone())?;

        info!(
            employee_id = %employee_id,
            date = %date,
            clock_in = %clock_in,
            is_late = record.is_late,
            "Clocked in"
        );
        Ok(record)
    }

    /// Closes today's record, where today comes from the ledger clock.
    pub fn clock_out(&self, employee_id: &str, time: &str) -> LedgerResult<AttendanceRecord> {
        let today = self.context.clock().today();
        self.clock_out_on(employee_id, today, time)
    }

    /// Closes the record for `date`. A closed record is never overwritten.
    pub fn clock_out_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> LedgerResult<AttendanceRecord> {
        let clock_out = parse_clock_time("clock_out", time)?;

        let open = self
            .context
            .store()
            .get_attendance(employee_id, date)?
            .ok_or_else(|| {
                LedgerError::not_found("attendance record", format!("{} {}", employee_id, date))
            })?;
        if let Some(clock_in) = open.clock_in {
            if clock_out < clock_in {
                return Err(LedgerError::validation(
                    "clock_out",
                    format!("{} is before clock-in at {}", clock_out, clock_in),
                ));
            }
        }

        let record = self
            .context
            .store()
            .close_attendance(employee_id, date, clock_out)?;
        info!(employee_id = %employee_id, date = %date, clock_out = %clock_out, "Clocked out");
        Ok(record)
    }

    /// Records a day without a clock-in (sick, excused or absent).
    pub fn mark_status(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> LedgerResult<AttendanceRecord> {
        if status == AttendanceStatus::Present {
            return Err(LedgerError::validation(
                "status",
                "present days are recorded by clocking in",
            ));
        }
        self.registry.get(employee_id)?;

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            date,
            clock_in: None,
            clock_out: None,
            status,
            is_late: false,
        };
        self.context.store().insert_attendance(record.clone())?;

        debug!(employee_id = %employee_id, date = %date, status = ?status, "Attendance status marked");
        Ok(record)
    }

    /// All records of an employee, most recent first.
    pub fn history(&self, employee_id: &str) -> LedgerResult<Vec<AttendanceRecord>> {
        let mut records = self.context.store().list_attendance(employee_id)?;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    /// Counts of present, late, sick, excused and absent days in `period`.
    pub fn monthly_summary(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<AttendanceSummary> {
        self.registry.get(employee_id)?;
        let records = self.context.store().list_attendance(employee_id)?;
        Ok(AttendanceSummary::tally(employee_id, period, &records))
    }
}
