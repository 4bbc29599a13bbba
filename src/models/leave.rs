//! Leave request model and its state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a leave request.
///
/// `Pending` is the only non-terminal state; a request moves out of it
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; leave days were deducted.
    Approved,
    /// Rejected; no balance change.
    Rejected,
}

impl LeaveStatus {
    /// Returns true for `Approved` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

/// A decision an approver can take on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// Grant the leave.
    Approve,
    /// Refuse the leave.
    Reject,
}

impl LeaveDecision {
    /// The terminal status this decision leads to.
    pub fn target_status(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        }
    }
}

/// A leave request submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request id.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: String,
    /// Free-form leave category (e.g. "annual", "sick").
    pub leave_type: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Days counted against the balance on approval.
    pub total_days: i32,
    /// Why the leave is requested.
    pub reason: String,
    /// Current lifecycle state.
    pub status: LeaveStatus,
    /// Who decided the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<String>,
    /// Notes left by the approver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_notes: Option<String>,
    /// When the request was submitted.
    pub requested_at: DateTime<Utc>,
    /// When the request was decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Returns true while the request awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }
}
