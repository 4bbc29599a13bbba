//! Performance ledger: division KPI, supervisor evaluations and the
//! score cascade into employee records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Employee, EvaluationRecord, EvaluationScores, KpiRecord, MonthlyEvaluationRecord, Period,
    Role, validate_score,
};

use super::{EmployeeRegistry, LedgerContext};

/// Result of recording a division KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCascade {
    /// The stored record.
    pub record: KpiRecord,
    /// The record it replaced for the same division and period, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced: Option<KpiRecord>,
    /// Individual contributors whose `kpi_score` was set, ordered by id.
    pub updated_employees: Vec<String>,
}

/// Records KPI and evaluations and keeps employee scores in step.
#[derive(Clone)]
pub struct PerformanceLedger {
    context: LedgerContext,
    registry: EmployeeRegistry,
}

impl PerformanceLedger {
    pub(crate) fn new(context: LedgerContext, registry: EmployeeRegistry) -> Self {
        Self { context, registry }
    }

    /// Stores the KPI for `(division, period)` and broadcasts the same
    /// score to every individual contributor of the division.
    ///
    /// A second submission for the same key replaces the first. The
    /// broadcast is a sequence of record writes, not one atomic step.
    pub fn set_division_kpi(
        &self,
        division: &str,
        period: Period,
        score: Decimal,
        manager_id: &str,
        notes: Option<String>,
    ) -> LedgerResult<KpiCascade> {
        validate_score("score", score)?;
        if division.trim().is_empty() {
            return Err(LedgerError::validation("division", "cannot be empty"));
        }
        self.require_role("manager_id", manager_id, &[Role::Manager])?;

        let record = KpiRecord {
            division: division.to_string(),
            period,
            score,
            recorded_by: manager_id.to_string(),
            created_at: self.context.clock().now(),
            notes,
        };
        let replaced = self.context.store().upsert_kpi(record.clone())?;
        if replaced.is_some() {
            debug!(division = %division, period = %period, "Replacing existing KPI record");
        }

        let threshold = self.context.config().risk_threshold();
        let mut updated_employees = Vec::new();
        for mut employee in self.registry.list_by_division(division)? {
            if employee.role != Role::IndividualContributor {
                continue;
            }
            employee.apply_kpi_score(score, threshold);
            let saved = self.registry.update(employee)?;
            updated_employees.push(saved.id);
        }

        info!(
            division = %division,
            period = %period,
            score = %score,
            manager_id = %manager_id,
            employees = updated_employees.len(),
            "Division KPI recorded"
        );

        Ok(KpiCascade {
            record,
            replaced,
            updated_employees,
        })
    }

    /// Appends an ad-hoc evaluation and sets the employee's
    /// `supervisor_rating` to its overall score.
    pub fn record_evaluation(
        &self,
        employee_id: &str,
        supervisor_id: &str,
        scores: EvaluationScores,
        comments: &str,
    ) -> LedgerResult<EvaluationRecord> {
        scores.validate()?;
        self.require_role("supervisor_id", supervisor_id, &[Role::Supervisor, Role::Manager])?;
        let employee = self.registry.get(employee_id)?;

        let record = EvaluationRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            supervisor_id: supervisor_id.to_string(),
            punctuality_score: scores.punctuality,
            attendance_score: scores.attendance,
            overall_rating: scores.overall,
            comments: comments.to_string(),
            created_at: self.context.clock().now(),
        };
        self.context.store().append_evaluation(record.clone())?;
        self.apply_rating(employee, scores.overall)?;

        info!(
            employee_id = %employee_id,
            supervisor_id = %supervisor_id,
            overall = %scores.overall,
            "Evaluation recorded"
        );
        Ok(record)
    }

    /// Records the single evaluation allowed per employee and month.
    ///
    /// A second submission for the same period fails with a duplicate error
    /// and leaves the first record and the employee untouched.
    pub fn record_monthly_evaluation(
        &self,
        employee_id: &str,
        supervisor_id: &str,
        period: Period,
        scores: EvaluationScores,
        comments: &str,
    ) -> LedgerResult<MonthlyEvaluationRecord> {
        scores.validate()?;
        self.require_role("supervisor_id", supervisor_id, &[Role::Supervisor, Role::Manager])?;
        let employee = self.registry.get(employee_id)?;

        if self.has_monthly_evaluation(employee_id, period)? {
            warn!(employee_id = %employee_id, period = %period, "Monthly evaluation already recorded");
            return Err(duplicate_monthly(employee_id, period));
        }

        let record = MonthlyEvaluationRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            supervisor_id: supervisor_id.to_string(),
            period,
            punctuality_score: scores.punctuality,
            attendance_score: scores.attendance,
            productivity_score: scores.productivity,
            overall_rating: scores.overall,
            comments: comments.to_string(),
            created_at: self.context.clock().now(),
        };
        // The store re-checks the key, so a racing writer still loses.
        self.context
            .store()
            .insert_monthly_evaluation(record.clone())?;
        self.apply_rating(employee, scores.overall)?;

        info!(
            employee_id = %employee_id,
            supervisor_id = %supervisor_id,
            period = %period,
            overall = %scores.overall,
            "Monthly evaluation recorded"
        );
        Ok(record)
    }

    /// Returns true if a monthly evaluation exists for the key.
    pub fn has_monthly_evaluation(&self, employee_id: &str, period: Period) -> LedgerResult<bool> {
        Ok(self
            .context
            .store()
            .get_monthly_evaluation(employee_id, period)?
            .is_some())
    }

    /// Mean of every KPI record per division across all periods, rounded
    /// to two decimal places.
    pub fn average_kpi_by_division(&self) -> LedgerResult<BTreeMap<String, Decimal>> {
        let mut sums: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();
        for record in self.context.store().list_kpi()? {
            let entry = sums.entry(record.division).or_insert((Decimal::ZERO, 0));
            entry.0 += record.score;
            entry.1 += 1;
        }

        Ok(sums
            .into_iter()
            .map(|(division, (sum, count))| (division, (sum / Decimal::from(count)).round_dp(2)))
            .collect())
    }

    /// KPI records of a division, newest period first.
    pub fn kpi_history(&self, division: &str) -> LedgerResult<Vec<KpiRecord>> {
        let mut records: Vec<KpiRecord> = self
            .context
            .store()
            .list_kpi()?
            .into_iter()
            .filter(|r| r.division == division)
            .collect();
        records.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(records)
    }

    /// Ad-hoc evaluations of an employee, newest first.
    pub fn evaluations_for(&self, employee_id: &str) -> LedgerResult<Vec<EvaluationRecord>> {
        let mut records = self.context.store().list_evaluations(employee_id)?;
        records.reverse();
        Ok(records)
    }

    /// Monthly evaluations of an employee, newest period first.
    pub fn monthly_evaluations_for(
        &self,
        employee_id: &str,
    ) -> LedgerResult<Vec<MonthlyEvaluationRecord>> {
        let mut records = self.context.store().list_monthly_evaluations(employee_id)?;
        records.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(records)
    }

    /// Employees currently flagged as layoff risks, ordered by id.
    pub fn at_risk_employees(&self) -> LedgerResult<Vec<Employee>> {
        Ok(self
            .registry
            .list()?
            .into_iter()
            .filter(|e| e.layoff_risk)
            .collect())
    }

    fn apply_rating(&self, mut employee: Employee, rating: Decimal) -> LedgerResult<Employee> {
        employee.apply_supervisor_rating(rating, self.context.config().risk_threshold());
        self.registry.update(employee)
    }

    fn require_role(&self, field: &str, id: &str, allowed: &[Role]) -> LedgerResult<Employee> {
        let employee = self.registry.get(id).map_err(|e| match e {
            LedgerError::NotFound { .. } => {
                LedgerError::validation(field, format!("unknown employee '{}'", id))
            }
            other => other,
        })?;

        if !allowed.contains(&employee.role) {
            return Err(LedgerError::validation(
                field,
                format!("'{}' has role {:?}, expected one of {:?}", id, employee.role, allowed),
            ));
        }
        Ok(employee)
    }
}

fn duplicate_monthly(employee_id: &str, period: Period) -> LedgerError {
    LedgerError::Duplicate {
        entity: "monthly evaluation",
        key: format!("{} {}", employee_id, period),
    }
}
