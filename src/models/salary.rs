//! Compensation models for the ledger.
//!
//! This module contains the [`SalaryBreakdown`] produced by the
//! compensation rules, the [`SalaryHistoryRecord`] audit trail persisted
//! for each paid month, and the [`AuditStep`] entries that explain how each
//! figure was reached.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// A single step in a salary calculation recording a tier decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use workforce_ledger::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "kpi_bonus".to_string(),
///     rule_name: "KPI Bonus".to_string(),
///     input: serde_json::json!({"kpi_score": "85"}),
///     output: serde_json::json!({"rate": "0.15"}),
///     reasoning: "KPI 85 is at least 80: 15% of base".to_string(),
/// };
/// assert_eq!(step.rule_id, "kpi_bonus");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The monthly salary derived from an employee's current scores.
///
/// `total_salary = base_salary + kpi_bonus + supervisor_bonus - penalty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// The employee the salary is for.
    pub employee_id: String,
    /// Monthly base pay.
    pub base_salary: Decimal,
    /// Bonus from the KPI tier table.
    pub kpi_bonus: Decimal,
    /// Bonus from the supervisor-rating tier table.
    pub supervisor_bonus: Decimal,
    /// Deduction applied when either score is below the penalty threshold.
    pub penalty: Decimal,
    /// The resulting take-home figure.
    pub total_salary: Decimal,
    /// KPI score used for the calculation.
    pub kpi_score: Decimal,
    /// Supervisor rating used for the calculation.
    pub supervisor_rating: Decimal,
    /// How each component was decided.
    pub audit_steps: Vec<AuditStep>,
}

/// Point-in-time payroll row. One per `(employee_id, period)`, append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryHistoryRecord {
    /// Record id.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The month paid.
    pub period: Period,
    /// Monthly base pay at the time.
    pub base_salary: Decimal,
    /// KPI bonus paid.
    pub kpi_bonus: Decimal,
    /// Supervisor bonus paid.
    pub supervisor_bonus: Decimal,
    /// Penalty deducted.
    pub penalty: Decimal,
    /// Total paid.
    pub total_salary: Decimal,
    /// KPI score at the time of payment.
    pub kpi_score_snapshot: Decimal,
    /// Supervisor rating at the time of payment.
    pub supervisor_rating_snapshot: Decimal,
    /// When the snapshot was recorded.
    pub paid_at: DateTime<Utc>,
}

impl SalaryHistoryRecord {
    /// Freezes a breakdown into a history row.
    pub fn from_breakdown(
        breakdown: &SalaryBreakdown,
        period: Period,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: breakdown.employee_id.clone(),
            period,
            base_salary: breakdown.base_salary,
            kpi_bonus: breakdown.kpi_bonus,
            supervisor_bonus: breakdown.supervisor_bonus,
            penalty: breakdown.penalty,
            total_salary: breakdown.total_salary,
            kpi_score_snapshot: breakdown.kpi_score,
            supervisor_rating_snapshot: breakdown.supervisor_rating,
            paid_at,
        }
    }
}

/// Outcome of snapshotting salaries for every active employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// The month paid.
    pub period: Period,
    /// Snapshots written by this run.
    pub recorded: Vec<SalaryHistoryRecord>,
    /// Employees already paid for the period before the run.
    pub skipped: Vec<String>,
}

impl PayrollRun {
    /// Sum of `total_salary` across the recorded snapshots, or `None` when
    /// the sum does not fit in a `Decimal`.
    pub fn total_paid(&self) -> Option<Decimal> {
        self.recorded
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| sum.checked_add(r.total_salary))
    }
}
