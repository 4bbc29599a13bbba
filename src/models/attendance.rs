//! Attendance records and monthly summaries.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// How a day was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Clocked in.
    Present,
    /// Off sick.
    Sick,
    /// Absence with permission.
    Excused,
    /// Absence without permission.
    Absent,
}

/// One row per employee per day.
///
/// Created on clock-in (or when a non-present status is marked) and
/// closed on clock-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Record id.
    pub id: Uuid,
    /// The employee.
    pub employee_id: String,
    /// The working day.
    pub date: NaiveDate,
    /// Clock-in time; absent for sick/excused/absent days.
    pub clock_in: Option<NaiveTime>,
    /// Clock-out time; absent until the day is closed.
    pub clock_out: Option<NaiveTime>,
    /// How the day was recorded.
    pub status: AttendanceStatus,
    /// True when clock-in was strictly after the lateness threshold.
    pub is_late: bool,
}

impl AttendanceRecord {
    /// Returns true while the employee is clocked in and not yet out.
    pub fn is_open(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }
}

/// Per-status day counts for one employee and month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The employee.
    pub employee_id: String,
    /// The month summarized.
    pub period: Option<Period>,
    /// Days with a clock-in.
    pub present: u32,
    /// Present days that started late.
    pub late: u32,
    /// Sick days.
    pub sick: u32,
    /// Excused days.
    pub excused: u32,
    /// Unexcused absences.
    pub absent: u32,
}

impl AttendanceSummary {
    /// Tallies the records that fall inside `period`.
    pub fn tally<'a>(
        employee_id: &str,
        period: Period,
        records: impl IntoIterator<Item = &'a AttendanceRecord>,
    ) -> Self {
        let mut summary = Self {
            employee_id: employee_id.to_string(),
            period: Some(period),
            ..Self::default()
        };

        for record in records {
            if record.employee_id != employee_id || !period.contains(record.date) {
                continue;
            }
            match record.status {
                AttendanceStatus::Present => {
                    summary.present += 1;
                    if record.is_late {
                        summary.late += 1;
                    }
                }
                AttendanceStatus::Sick => summary.sick += 1,
                AttendanceStatus::Excused => summary.excused += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
        }

        summary
    }
}
