//! Core data models for the workforce ledger.
//!
//! This module contains all the domain records shared by the store, the
//! services and the HTTP API.

mod attendance;
mod employee;
mod leave;
mod performance;
mod period;
mod salary;

pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
pub use employee::{Employee, EmploymentStatus, NewEmployee, Role, is_layoff_risk};
pub use leave::{LeaveDecision, LeaveRequest, LeaveStatus};
pub use performance::{
    EvaluationRecord, EvaluationScores, KpiRecord, MAX_SCORE, MonthlyEvaluationRecord,
    validate_score,
};
pub use period::Period;
pub use salary::{AuditStep, PayrollRun, SalaryBreakdown, SalaryHistoryRecord};
