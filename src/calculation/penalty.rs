//! Performance penalty calculation.

use rust_decimal::Decimal;

use crate::error::LedgerResult;
use crate::models::AuditStep;

use super::salary_overflow;

/// The result of evaluating the penalty rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyResult {
    /// The deduction; zero when the rule did not trigger.
    pub amount: Decimal,
    /// Whether either score fell below the threshold.
    pub applied: bool,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// Deducts `rate` of base salary when the KPI score or the supervisor
/// rating is strictly below `threshold`.
///
/// The penalty does not depend on which tier the other score reaches.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use workforce_ledger::calculation::calculate_penalty;
///
/// let result = calculate_penalty(
///     Decimal::from(1_000_000),
///     Decimal::from(50),
///     Decimal::from(95),
///     Decimal::from(60),
///     Decimal::new(10, 2),
///     1,
/// )
/// .unwrap();
/// assert!(result.applied);
/// assert_eq!(result.amount, Decimal::from(100_000));
/// ```
pub fn calculate_penalty(
    base_salary: Decimal,
    kpi_score: Decimal,
    supervisor_rating: Decimal,
    threshold: Decimal,
    rate: Decimal,
    step_number: u32,
) -> LedgerResult<PenaltyResult> {
    let kpi_below = kpi_score < threshold;
    let rating_below = supervisor_rating < threshold;
    let applied = kpi_below || rating_below;
    let amount = if applied {
        base_salary
            .checked_mul(rate)
            .ok_or_else(|| salary_overflow("performance_penalty"))?
    } else {
        Decimal::ZERO
    };
    let percent = rate
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| salary_overflow("performance_penalty"))?;

    let reasoning = if applied {
        let mut causes = Vec::new();
        if kpi_below {
            causes.push(format!("kpi_score {}", kpi_score.normalize()));
        }
        if rating_below {
            causes.push(format!("supervisor_rating {}", supervisor_rating.normalize()));
        }
        format!(
            "{} below {}: deduct {}% of ${} = ${}",
            causes.join(" and "),
            threshold.normalize(),
            percent.normalize(),
            base_salary.normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "kpi_score {} and supervisor_rating {} both at or above {}, no penalty",
            kpi_score.normalize(),
            supervisor_rating.normalize(),
            threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "performance_penalty".to_string(),
        rule_name: "Performance Penalty".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "kpi_score": kpi_score.normalize().to_string(),
            "supervisor_rating": supervisor_rating.normalize().to_string(),
            "threshold": threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "applied": applied,
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    Ok(PenaltyResult {
        amount,
        applied,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn penalty(kpi: &str, rating: &str) -> PenaltyResult {
        calculate_penalty(dec("1000000"), dec(kpi), dec(rating), dec("60"), dec("0.10"), 1).unwrap()
    }

    #[test]
    fn test_no_penalty_at_threshold() {
        let result = penalty("60", "60");
        assert!(!result.applied);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("no penalty"));
    }

    #[test]
    fn test_low_kpi_triggers_penalty() {
        let result = penalty("50", "95");
        assert!(result.applied);
        assert_eq!(result.amount, dec("100000"));
        assert!(result.audit_step.reasoning.contains("kpi_score 50"));
    }

    #[test]
    fn test_low_rating_triggers_penalty() {
        let result = penalty("95", "59.9");
        assert!(result.applied);
        assert_eq!(result.amount, dec("100000"));
        assert!(result.audit_step.reasoning.contains("supervisor_rating 59.9"));
    }

    #[test]
    fn test_both_low_penalized_once() {
        let result = penalty("10", "10");
        assert_eq!(result.amount, dec("100000"));
        assert!(result.audit_step.reasoning.contains(" and "));
    }

    #[test]
    fn test_audit_step_output() {
        let result = penalty("50", "80");
        assert_eq!(result.audit_step.rule_id, "performance_penalty");
        assert_eq!(result.audit_step.output["applied"], true);
        assert_eq!(result.audit_step.output["amount"].as_str().unwrap(), "100000");
    }
}
