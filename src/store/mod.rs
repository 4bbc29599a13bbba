//! The `LedgerStore` trait: the persistence boundary of the ledger.
//!
//! The trait mirrors the logical schema (`employees`, `kpi`, `evaluations`,
//! `monthly_evaluations`, `attendance`, `leave_requests`, `salary_history`).
//! Services depend on this abstraction, not on a concrete backend, and
//! receive it as an `Arc<dyn LedgerStore>`.
//!
//! Every method is atomic on its own. Unique keys are enforced by the
//! store: inserts into a taken key fail with
//! [`LedgerError::Duplicate`](crate::error::LedgerError::Duplicate) rather
//! than overwriting. Multi-step cascades built from several calls are not
//! atomic as a whole.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::{
    AttendanceRecord, Employee, EvaluationRecord, KpiRecord, LeaveDecision, LeaveRequest,
    MonthlyEvaluationRecord, Period, SalaryHistoryRecord,
};

/// Abstraction over a ledger storage backend.
///
/// Methods fail with a storage error while the store is closed.
pub trait LedgerStore: Send + Sync {
    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Makes the store available for reads and writes.
    fn open(&self) -> LedgerResult<()>;

    /// Stops serving reads and writes. Data is kept.
    fn close(&self) -> LedgerResult<()>;

    /// Returns true between `open` and `close`.
    fn is_open(&self) -> bool;

    // ── Employees ─────────────────────────────────────────────────────────

    /// Inserts a new employee; the id must be unused.
    fn insert_employee(&self, employee: Employee) -> LedgerResult<()>;

    /// Returns a copy of the employee, if any.
    fn get_employee(&self, id: &str) -> LedgerResult<Option<Employee>>;

    /// Replaces the whole record (last write wins). The id must exist.
    fn save_employee(&self, employee: Employee) -> LedgerResult<()>;

    /// All employees ordered by id.
    fn list_employees(&self) -> LedgerResult<Vec<Employee>>;

    // ── KPI ───────────────────────────────────────────────────────────────

    /// Inserts or replaces the record for `(division, period)`. Returns the
    /// record it replaced.
    fn upsert_kpi(&self, record: KpiRecord) -> LedgerResult<Option<KpiRecord>>;

    /// The record for `(division, period)`, if any.
    fn get_kpi(&self, division: &str, period: Period) -> LedgerResult<Option<KpiRecord>>;

    /// All KPI records ordered by division then period.
    fn list_kpi(&self) -> LedgerResult<Vec<KpiRecord>>;

    // ── Evaluations ───────────────────────────────────────────────────────

    /// Appends an ad-hoc evaluation.
    fn append_evaluation(&self, record: EvaluationRecord) -> LedgerResult<()>;

    /// Ad-hoc evaluations of an employee in insertion order.
    fn list_evaluations(&self, employee_id: &str) -> LedgerResult<Vec<EvaluationRecord>>;

    /// Inserts a monthly evaluation; `(employee_id, period)` must be unused.
    fn insert_monthly_evaluation(&self, record: MonthlyEvaluationRecord) -> LedgerResult<()>;

    /// The monthly evaluation for `(employee_id, period)`, if any.
    fn get_monthly_evaluation(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<MonthlyEvaluationRecord>>;

    /// Monthly evaluations of an employee ordered by period.
    fn list_monthly_evaluations(
        &self,
        employee_id: &str,
    ) -> LedgerResult<Vec<MonthlyEvaluationRecord>>;

    // ── Attendance ────────────────────────────────────────────────────────

    /// Inserts a day record; `(employee_id, date)` must be unused.
    fn insert_attendance(&self, record: AttendanceRecord) -> LedgerResult<()>;

    /// The record for `(employee_id, date)`, if any.
    fn get_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<AttendanceRecord>>;

    /// Sets `clock_out` on an open record in one step.
    ///
    /// Fails with not-found when there is no record for the day and with a
    /// state error when the record has no clock-in or is already closed.
    fn close_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        clock_out: NaiveTime,
    ) -> LedgerResult<AttendanceRecord>;

    /// Records of an employee ordered by date.
    fn list_attendance(&self, employee_id: &str) -> LedgerResult<Vec<AttendanceRecord>>;

    // ── Leave requests ────────────────────────────────────────────────────

    /// Inserts a new request.
    fn insert_leave_request(&self, request: LeaveRequest) -> LedgerResult<()>;

    /// The request with `id`, if any.
    fn get_leave_request(&self, id: Uuid) -> LedgerResult<Option<LeaveRequest>>;

    /// All requests in submission order.
    fn list_leave_requests(&self) -> LedgerResult<Vec<LeaveRequest>>;

    /// Moves a pending request to the decision's terminal state and stamps
    /// the approver, in one step.
    ///
    /// Fails with not-found for an unknown id and with a state error when
    /// the request is no longer pending; in both cases nothing changes.
    fn decide_leave_request(
        &self,
        id: Uuid,
        decision: LeaveDecision,
        approver_id: &str,
        notes: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> LedgerResult<LeaveRequest>;

    // ── Salary history ────────────────────────────────────────────────────

    /// Inserts a snapshot; `(employee_id, period)` must be unused.
    fn insert_salary_record(&self, record: SalaryHistoryRecord) -> LedgerResult<()>;

    /// The snapshot for `(employee_id, period)`, if any.
    fn get_salary_record(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<SalaryHistoryRecord>>;

    /// Snapshots of an employee ordered by period.
    fn list_salary_records(&self, employee_id: &str) -> LedgerResult<Vec<SalaryHistoryRecord>>;
}
