//! Compensation engine: salary derivation and monthly payroll snapshots.

use tracing::{info, warn};

use crate::calculation;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, PayrollRun, Period, SalaryBreakdown, SalaryHistoryRecord};

use super::{EmployeeRegistry, LedgerContext};

/// Derives salaries and records them once per employee and month.
#[derive(Clone)]
pub struct CompensationEngine {
    context: LedgerContext,
    registry: EmployeeRegistry,
}

impl CompensationEngine {
    pub(crate) fn new(context: LedgerContext, registry: EmployeeRegistry) -> Self {
        Self { context, registry }
    }

    /// Salary from the employee's current scores using the configured
    /// tiers. Reads nothing from the store.
    pub fn compute_monthly_salary(&self, employee: &Employee) -> LedgerResult<SalaryBreakdown> {
        calculation::compute_monthly_salary(employee, &self.context.config().config().compensation)
    }

    /// Looks the employee up and computes their salary.
    pub fn salary_for(&self, employee_id: &str) -> LedgerResult<SalaryBreakdown> {
        let employee = self.registry.get(employee_id)?;
        self.compute_monthly_salary(&employee).inspect_err(|e| {
            warn!(employee_id = %employee_id, error = %e, "Salary could not be computed");
        })
    }

    /// Freezes the current salary for `period`.
    ///
    /// A period can be paid once; a second snapshot fails with a duplicate
    /// error and the first is kept.
    pub fn record_salary_snapshot(
        &self,
        employee_id: &str,
        period: Period,
    ) -> LedgerResult<SalaryHistoryRecord> {
        let breakdown = self.salary_for(employee_id)?;
        let record =
            SalaryHistoryRecord::from_breakdown(&breakdown, period, self.context.clock().now());

        self.context
            .store()
            .insert_salary_record(record.clone())
            .inspect_err(|e| {
                warn!(employee_id = %employee_id, period = %period, error = %e, "Salary snapshot refused");
            })?;

        info!(
            employee_id = %employee_id,
            period = %period,
            total = %record.total_salary,
            "Salary snapshot recorded"
        );
        Ok(record)
    }

    /// Snapshots of an employee, newest period first.
    pub fn salary_history(&self, employee_id: &str) -> LedgerResult<Vec<SalaryHistoryRecord>> {
        let mut records = self.context.store().list_salary_records(employee_id)?;
        records.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(records)
    }

    /// Snapshots every active employee not yet paid for `period`.
    ///
    /// Employees already paid are reported in `skipped`. Inactive employees
    /// are left out entirely. Every salary is computed before the first
    /// snapshot is written, so a salary that cannot be computed fails the
    /// run without recording anything.
    pub fn run_payroll(&self, period: Period) -> LedgerResult<PayrollRun> {
        let mut run = PayrollRun {
            period,
            recorded: Vec::new(),
            skipped: Vec::new(),
        };

        let now = self.context.clock().now();
        let records = self
            .registry
            .list()?
            .into_iter()
            .filter(|employee| employee.is_active())
            .map(|employee| -> LedgerResult<SalaryHistoryRecord> {
                let breakdown = self.compute_monthly_salary(&employee).inspect_err(|e| {
                    warn!(employee_id = %employee.id, period = %period, error = %e, "Payroll run aborted");
                })?;
                Ok(SalaryHistoryRecord::from_breakdown(&breakdown, period, now))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        for record in records {
            match self.context.store().insert_salary_record(record.clone()) {
                Ok(()) => run.recorded.push(record),
                Err(LedgerError::Duplicate { .. }) => run.skipped.push(record.employee_id),
                Err(e) => return Err(e),
            }
        }

        info!(
            period = %period,
            recorded = run.recorded.len(),
            skipped = run.skipped.len(),
            total = ?run.total_paid(),
            "Payroll run completed"
        );
        Ok(run)
    }
}
