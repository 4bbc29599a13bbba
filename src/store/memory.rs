//! In-memory [`LedgerStore`] backed by keyed maps.
//!
//! Each table sits behind its own `RwLock`, so a single call is atomic but a
//! sequence of calls is not.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AttendanceRecord, Employee, EvaluationRecord, KpiRecord, LeaveDecision, LeaveRequest,
    MonthlyEvaluationRecord, Period, SalaryHistoryRecord,
};

use super::LedgerStore;

type PeriodKey = (String, Period);

/// Process-local store. Create one per test for isolation, or share one
/// behind an `Arc` to give every caller the same view.
#[derive(Debug, Default)]
pub struct MemoryStore {
    open: AtomicBool,
    employees: RwLock<BTreeMap<String, Employee>>,
    kpi: RwLock<BTreeMap<PeriodKey, KpiRecord>>,
    evaluations: RwLock<Vec<EvaluationRecord>>,
    monthly_evaluations: RwLock<BTreeMap<PeriodKey, MonthlyEvaluationRecord>>,
    attendance: RwLock<BTreeMap<(String, NaiveDate), AttendanceRecord>>,
    leave_requests: RwLock<Vec<LeaveRequest>>,
    salary_history: RwLock<BTreeMap<PeriodKey, SalaryHistoryRecord>>,
}

impl MemoryStore {
    /// Creates an empty, closed store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that is already open.
    pub fn opened() -> Self {
        let store = Self::new();
        store.open.store(true, Ordering::SeqCst);
        store
    }

    fn ensure_open(&self) -> LedgerResult<()> {
        if self.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LedgerError::storage("store is closed"))
        }
    }

    fn read<'a, T>(&self, table: &'a RwLock<T>) -> LedgerResult<RwLockReadGuard<'a, T>> {
        self.ensure_open()?;
        table
            .read()
            .map_err(|_| LedgerError::storage("table lock poisoned"))
    }

    fn write<'a, T>(&self, table: &'a RwLock<T>) -> LedgerResult<RwLockWriteGuard<'a, T>> {
        self.ensure_open()?;
        table
            .write()
            .map_err(|_| LedgerError::storage("table lock poisoned"))
    }
}

fn period_key(id: &str, period: Period) -> PeriodKey {
    (id.to_string(), period)
}

impl LedgerStore for MemoryStore {
    fn open(&self) -> LedgerResult<()> {
        self.open.store(true, Ordering::SeqCst);
        debug!("memory store opened");
        Ok(())
    }

    fn close(&self) -> LedgerResult<()> {
        self.open.store(false, Ordering::SeqCst);
        debug!("memory store closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn insert_employee(&self, employee: Employee) -> LedgerResult<()> {
        let mut employees = self.write(&self.employees)?;
        if employees.contains_key(&employee.id) {
            return Err(LedgerError::Duplicate {
                entity: "employee",
                key: employee.id,
            });
        }
        employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn get_employee(&self, id: &str) -> LedgerResult<Option<Employee>> {
        Ok(self.read(&self.employees)?.get(id).cloned())
    }

    fn save_employee(&self, employee: Employee) -> LedgerResult<()> {
        let mut employees = self.write(&self.employees)?;
        match employees.get_mut(&employee.id) {
            Some(slot) => {
                *slot = employee;
                Ok(())
            }
            None => Err(LedgerError::not_found("employee", employee.id)),
        }
    }

    fn list_employees(&self) -> LedgerResult<Vec<Employee>> {
        Ok(self.read(&self.employees)?.values().cloned().collect())
    }

    fn upsert_kpi(&self, record: KpiRecord) -> LedgerResult<Option<KpiRecord>> {
        let mut kpi = self.write(&self.kpi)?;
        Ok(kpi.insert(period_key(&record.division, record.period), record))
    }

    fn get_kpi(&self, division: &str, period: Period) -> LedgerResult<Option<KpiRecord>> {
        Ok(self.read(&self.kpi)?.get(&period_key(division, period)).cloned())
    }

    fn list_kpi(&self) -> LedgerResult<Vec<KpiRecord>> {
        Ok(self.read(&self.kpi)?.values().cloned().collect())
    }

    fn append_evaluation(&self, record: EvaluationRecord) -> LedgerResult<()> {
        self.write(&self.evaluations)?.push(record);
        Ok(())
    }

    fn list_evaluations(&self, employee_id: &str) -> LedgerResult<Vec<EvaluationRecord>> {
        Ok(self
            .read(&self.evaluations)?
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_monthly_evaluation(&self, record: MonthlyEvaluationRecord) -> LedgerResult<()> {
        let mut table = self.write(&self.monthly_evaluations)?;
        let key = period_key(&record.employee_id, record.period);
        if table.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                entity: "monthly evaluation",
                key: format!("{} {}", record.employee_id, record.period),
            });
        }
        table.insert(key, record);
        Ok(())
    }

    fn get_monthly_evaluation(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<MonthlyEvaluationRecord>> {
        Ok(self
            .read(&self.monthly_evaluations)?
            .get(&period_key(employee_id, period))
            .cloned())
    }

    fn list_monthly_evaluations(
        &self,
        employee_id: &str,
    ) -> LedgerResult<Vec<MonthlyEvaluationRecord>> {
        Ok(self
            .read(&self.monthly_evaluations)?
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_attendance(&self, record: AttendanceRecord) -> LedgerResult<()> {
        let mut table = self.write(&self.attendance)?;
        let key = (record.employee_id.clone(), record.date);
        if table.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                entity: "attendance record",
                key: format!("{} {}", record.employee_id, record.date),
            });
        }
        table.insert(key, record);
        Ok(())
    }

    fn get_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<AttendanceRecord>> {
        Ok(self
            .read(&self.attendance)?
            .get(&(employee_id.to_string(), date))
            .cloned())
    }

    fn close_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        clock_out: NaiveTime,
    ) -> LedgerResult<AttendanceRecord> {
        let mut table = self.write(&self.attendance)?;
        let record = table
            .get_mut(&(employee_id.to_string(), date))
            .ok_or_else(|| {
                LedgerError::not_found("attendance record", format!("{} {}", employee_id, date))
            })?;

        if !record.is_open() {
            let state = if record.clock_out.is_some() {
                "closed"
            } else {
                "not clocked in"
            };
            return Err(LedgerError::State {
                entity: "attendance record",
                id: format!("{} {}", employee_id, date),
                state: state.to_string(),
                message: "no open clock-in to close".to_string(),
            });
        }

        record.clock_out = Some(clock_out);
        Ok(record.clone())
    }

    fn list_attendance(&self, employee_id: &str) -> LedgerResult<Vec<AttendanceRecord>> {
        Ok(self
            .read(&self.attendance)?
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn insert_leave_request(&self, request: LeaveRequest) -> LedgerResult<()> {
        let mut table = self.write(&self.leave_requests)?;
        if table.iter().any(|r| r.id == request.id) {
            return Err(LedgerError::Duplicate {
                entity: "leave request",
                key: request.id.to_string(),
            });
        }
        table.push(request);
        Ok(())
    }

    fn get_leave_request(&self, id: Uuid) -> LedgerResult<Option<LeaveRequest>> {
        Ok(self
            .read(&self.leave_requests)?
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn list_leave_requests(&self) -> LedgerResult<Vec<LeaveRequest>> {
        Ok(self.read(&self.leave_requests)?.clone())
    }

    fn decide_leave_request(
        &self,
        id: Uuid,
        decision: LeaveDecision,
        approver_id: &str,
        notes: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> LedgerResult<LeaveRequest> {
        let mut table = self.write(&self.leave_requests)?;
        let request = table
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::not_found("leave request", id.to_string()))?;

        if !request.is_pending() {
            return Err(LedgerError::State {
                entity: "leave request",
                id: id.to_string(),
                state: request.status.as_str().to_string(),
                message: "request is no longer pending".to_string(),
            });
        }

        request.status = decision.target_status();
        request.approver_id = Some(approver_id.to_string());
        request.approver_notes = notes;
        request.decided_at = Some(decided_at);
        Ok(request.clone())
    }

    fn insert_salary_record(&self, record: SalaryHistoryRecord) -> LedgerResult<()> {
        let mut table = self.write(&self.salary_history)?;
        let key = period_key(&record.employee_id, record.period);
        if table.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                entity: "salary record",
                key: format!("{} {}", record.employee_id, record.period),
            });
        }
        table.insert(key, record);
        Ok(())
    }

    fn get_salary_record(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<Option<SalaryHistoryRecord>> {
        Ok(self
            .read(&self.salary_history)?
            .get(&period_key(employee_id, period))
            .cloned())
    }

    fn list_salary_records(&self, employee_id: &str) -> LedgerResult<Vec<SalaryHistoryRecord>> {
        Ok(self
            .read(&self.salary_history)?
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }
}
