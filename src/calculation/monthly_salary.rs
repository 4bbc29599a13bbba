//! Monthly salary derivation.
//!
//! Combines base pay, the KPI bonus tier, the supervisor-rating bonus tier
//! and the performance penalty into a [`SalaryBreakdown`].

use rust_decimal::Decimal;

use crate::config::CompensationConfig;
use crate::error::LedgerResult;
use crate::models::{AuditStep, Employee, SalaryBreakdown};

use super::bonus_tiers::{calculate_kpi_bonus, calculate_supervisor_bonus};
use super::penalty::calculate_penalty;
use super::salary_overflow;

/// Computes an employee's monthly salary from their current scores.
///
/// This is a pure function of `base_salary`, `kpi_score` and
/// `supervisor_rating`:
///
/// `total = base + kpi_bonus + supervisor_bonus - penalty`
///
/// A base salary too large for the total to fit in a `Decimal` is a
/// validation error on `base_salary`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use workforce_ledger::calculation::compute_monthly_salary;
/// use workforce_ledger::config::CompensationConfig;
/// use workforce_ledger::models::{Employee, EmploymentStatus, Role};
///
/// let employee = Employee {
///     id: "EMP001".to_string(),
///     name: "Sari".to_string(),
///     credential: String::new(),
///     role: Role::IndividualContributor,
///     division: "IT".to_string(),
///     title: "Engineer".to_string(),
///     hire_date: NaiveDate::from_ymd_opt(2022, 4, 1).unwrap(),
///     remaining_leave_days: 12,
///     base_salary: Decimal::from(1_000_000),
///     kpi_score: Decimal::from(85),
///     supervisor_rating: Decimal::from(75),
///     layoff_risk: false,
///     status: EmploymentStatus::Active,
/// };
///
/// let salary = compute_monthly_salary(&employee, &CompensationConfig::default()).unwrap();
/// assert_eq!(salary.kpi_bonus, Decimal::from(150_000));
/// assert_eq!(salary.supervisor_bonus, Decimal::from(50_000));
/// assert_eq!(salary.penalty, Decimal::ZERO);
/// assert_eq!(salary.total_salary, Decimal::from(1_200_000));
/// ```
pub fn compute_monthly_salary(
    employee: &Employee,
    config: &CompensationConfig,
) -> LedgerResult<SalaryBreakdown> {
    let base = employee.base_salary;
    let mut audit_steps: Vec<AuditStep> = Vec::with_capacity(4);

    let kpi = calculate_kpi_bonus(base, employee.kpi_score, &config.kpi_tiers, 1)?;
    audit_steps.push(kpi.audit_step);

    let supervisor = calculate_supervisor_bonus(
        base,
        employee.supervisor_rating,
        &config.supervisor_tiers,
        2,
    )?;
    audit_steps.push(supervisor.audit_step);

    let penalty = calculate_penalty(
        base,
        employee.kpi_score,
        employee.supervisor_rating,
        config.penalty_threshold,
        config.penalty_rate,
        3,
    )?;
    audit_steps.push(penalty.audit_step);

    let total = base
        .checked_add(kpi.amount)
        .and_then(|sum| sum.checked_add(supervisor.amount))
        .and_then(|sum| sum.checked_sub(penalty.amount))
        .ok_or_else(|| salary_overflow("monthly_total"))?;

    audit_steps.push(AuditStep {
        step_number: 4,
        rule_id: "monthly_total".to_string(),
        rule_name: "Monthly Total".to_string(),
        input: serde_json::json!({
            "base_salary": base.normalize().to_string(),
            "kpi_bonus": kpi.amount.normalize().to_string(),
            "supervisor_bonus": supervisor.amount.normalize().to_string(),
            "penalty": penalty.amount.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_salary": total.normalize().to_string()
        }),
        reasoning: format!(
            "${} + ${} + ${} - ${} = ${}",
            base.normalize(),
            kpi.amount.normalize(),
            supervisor.amount.normalize(),
            penalty.amount.normalize(),
            total.normalize()
        ),
    });

    Ok(SalaryBreakdown {
        employee_id: employee.id.clone(),
        base_salary: base,
        kpi_bonus: kpi.amount,
        supervisor_bonus: supervisor.amount,
        penalty: penalty.amount,
        total_salary: total,
        kpi_score: employee.kpi_score,
        supervisor_rating: employee.supervisor_rating,
        audit_steps,
    })
}

/// Returns true when no component of the breakdown is negative and the
/// total adds up.
pub fn is_consistent(breakdown: &SalaryBreakdown) -> bool {
    let components = [
        breakdown.base_salary,
        breakdown.kpi_bonus,
        breakdown.supervisor_bonus,
        breakdown.penalty,
    ];
    let total = breakdown
        .base_salary
        .checked_add(breakdown.kpi_bonus)
        .and_then(|sum| sum.checked_add(breakdown.supervisor_bonus))
        .and_then(|sum| sum.checked_sub(breakdown.penalty));
    components.iter().all(|c| *c >= Decimal::ZERO) && total == Some(breakdown.total_salary)
}
