//! Leave workflow: submission, role-routed approval queues and balance
//! accounting on approval.
//!
//! A request moves `Pending -> Approved` or `Pending -> Rejected` exactly
//! once. The pending check and the status write happen in a single store
//! call, so of two concurrent decisions only one succeeds; the other gets a
//! [`LedgerError::State`].

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::count_leave_days;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{LeaveDecision, LeaveRequest, LeaveStatus, Role};

use super::{EmployeeRegistry, LedgerContext};

/// Leave request lifecycle.
#[derive(Clone)]
pub struct LeaveWorkflow {
    context: LedgerContext,
    registry: EmployeeRegistry,
}

impl LeaveWorkflow {
    pub(crate) fn new(context: LedgerContext, registry: EmployeeRegistry) -> Self {
        Self { context, registry }
    }

    /// Creates a pending request. The balance is not touched until approval.
    pub fn submit(
        &self,
        employee_id: &str,
        leave_type: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> LedgerResult<LeaveRequest> {
        if leave_type.trim().is_empty() {
            return Err(LedgerError::validation("leave_type", "cannot be empty"));
        }
        let exclude_weekends = self.context.config().config().leave.exclude_weekends;
        let total_days = count_leave_days(start_date, end_date, exclude_weekends)?;
        if total_days == 0 {
            return Err(LedgerError::validation(
                "end_date",
                "request covers no working days",
            ));
        }
        self.registry.get(employee_id)?;

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            leave_type: leave_type.to_string(),
            start_date,
            end_date,
            total_days,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            approver_id: None,
            approver_notes: None,
            requested_at: self.context.clock().now(),
            decided_at: None,
        };
        self.context.store().insert_leave_request(request.clone())?;

        info!(
            request_id = %request.id,
            employee_id = %employee_id,
            total_days = total_days,
            "Leave request submitted"
        );
        Ok(request)
    }

    /// Approves a pending request and deducts its days from the requester's
    /// balance. The deduction is not capped and may leave a negative balance.
    pub fn approve(
        &self,
        request_id: Uuid,
        approver_id: &str,
        notes: Option<String>,
    ) -> LedgerResult<LeaveRequest> {
        let request = self.decide(request_id, LeaveDecision::Approve, approver_id, notes)?;

        let mut employee = self.registry.get(&request.employee_id)?;
        employee.remaining_leave_days -= request.total_days;
        if employee.remaining_leave_days < 0 {
            warn!(
                employee_id = %employee.id,
                remaining = employee.remaining_leave_days,
                "Leave balance is negative after approval"
            );
        }
        self.registry.update(employee)?;

        Ok(request)
    }

    /// Rejects a pending request. The balance is unchanged.
    pub fn reject(
        &self,
        request_id: Uuid,
        approver_id: &str,
        notes: Option<String>,
    ) -> LedgerResult<LeaveRequest> {
        self.decide(request_id, LeaveDecision::Reject, approver_id, notes)
    }

    /// The request with `request_id`.
    pub fn get(&self, request_id: Uuid) -> LedgerResult<LeaveRequest> {
        self.context
            .store()
            .get_leave_request(request_id)?
            .ok_or_else(|| LedgerError::not_found("leave request", request_id.to_string()))
    }

    /// Pending requests `approver_id` may decide, oldest first.
    ///
    /// A supervisor sees individual contributors of their own division. A
    /// manager sees every supervisor and individual contributor. Anyone
    /// else sees nothing.
    pub fn list_for_approval(&self, approver_id: &str) -> LedgerResult<Vec<LeaveRequest>> {
        let approver = self.registry.get(approver_id)?;

        let roles: HashMap<String, (Role, String)> = self
            .registry
            .list()?
            .into_iter()
            .map(|e| (e.id, (e.role, e.division)))
            .collect();

        let routed = |request: &LeaveRequest| -> bool {
            let Some((role, division)) = roles.get(&request.employee_id) else {
                return false;
            };
            match approver.role {
                Role::Supervisor => {
                    *role == Role::IndividualContributor && *division == approver.division
                }
                Role::Manager => matches!(role, Role::IndividualContributor | Role::Supervisor),
                Role::IndividualContributor => false,
            }
        };

        let mut queue: Vec<LeaveRequest> = self
            .pending()?
            .into_iter()
            .filter(|r| routed(r))
            .collect();
        queue.sort_by_key(|r| r.requested_at);
        Ok(queue)
    }

    /// All requests of an employee, newest first.
    pub fn list_by_employee(&self, employee_id: &str) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(newest_first(
            self.context
                .store()
                .list_leave_requests()?
                .into_iter()
                .filter(|r| r.employee_id == employee_id)
                .collect(),
        ))
    }

    /// Every pending request, oldest first.
    pub fn list_pending(&self) -> LedgerResult<Vec<LeaveRequest>> {
        let mut pending = self.pending()?;
        pending.sort_by_key(|r| r.requested_at);
        Ok(pending)
    }

    /// Pending requests of an employee, newest first.
    pub fn list_pending_by_employee(&self, employee_id: &str) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(newest_first(
            self.pending()?
                .into_iter()
                .filter(|r| r.employee_id == employee_id)
                .collect(),
        ))
    }

    fn pending(&self) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(self
            .context
            .store()
            .list_leave_requests()?
            .into_iter()
            .filter(LeaveRequest::is_pending)
            .collect())
    }

    fn decide(
        &self,
        request_id: Uuid,
        decision: LeaveDecision,
        approver_id: &str,
        notes: Option<String>,
    ) -> LedgerResult<LeaveRequest> {
        self.registry.get(approver_id)?;

        let decided_at = self.context.clock().now();
        let request = self
            .context
            .store()
            .decide_leave_request(request_id, decision, approver_id, notes, decided_at)
            .inspect_err(|e| {
                warn!(request_id = %request_id, error = %e, "Leave decision refused");
            })?;

        info!(
            request_id = %request_id,
            employee_id = %request.employee_id,
            approver_id = %approver_id,
            status = request.status.as_str(),
            "Leave request decided"
        );
        Ok(request)
    }
}

/// Store order is submission order, so reversing before a stable sort
/// keeps later submissions first among equal timestamps.
fn newest_first(mut requests: Vec<LeaveRequest>) -> Vec<LeaveRequest> {
    requests.reverse();
    requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
    requests
}
