//! Tiered bonus calculation.
//!
//! KPI and supervisor-rating bonuses are both non-linear step functions of a
//! score: the highest tier whose inclusive lower bound the score reaches
//! decides the percentage of base salary paid.

use rust_decimal::Decimal;

use crate::config::BonusTier;
use crate::error::LedgerResult;
use crate::models::AuditStep;

use super::salary_overflow;

/// The result of applying a tier table, including the amount and audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusResult {
    /// The bonus amount (`base * rate`).
    pub amount: Decimal,
    /// The rate applied; zero when no tier was reached.
    pub rate: Decimal,
    /// The audit step recording the tier decision.
    pub audit_step: AuditStep,
}

/// Returns the highest tier whose lower bound `score` reaches.
///
/// `tiers` may be in any order.
///
/// ```
/// use rust_decimal::Decimal;
/// use workforce_ledger::calculation::find_tier;
/// use workforce_ledger::config::BonusTier;
///
/// let tiers = vec![BonusTier::percent(90, 20), BonusTier::percent(80, 15)];
/// assert_eq!(find_tier(Decimal::from(85), &tiers), Some(&tiers[1]));
/// assert_eq!(find_tier(Decimal::from(79), &tiers), None);
/// ```
pub fn find_tier(score: Decimal, tiers: &[BonusTier]) -> Option<&BonusTier> {
    tiers
        .iter()
        .filter(|tier| score >= tier.min_score)
        .max_by(|a, b| a.min_score.cmp(&b.min_score))
}

/// Calculates the KPI bonus for a base salary.
///
/// With the default tiers: 90+ → 20%, 80+ → 15%, 70+ → 10%, 60+ → 5%,
/// otherwise nothing. Fails with a validation error when the bonus does
/// not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use workforce_ledger::calculation::calculate_kpi_bonus;
/// use workforce_ledger::config::CompensationConfig;
///
/// let tiers = CompensationConfig::default().kpi_tiers;
/// let result =
///     calculate_kpi_bonus(Decimal::from(1_000_000), Decimal::from(85), &tiers, 1).unwrap();
/// assert_eq!(result.amount, Decimal::from(150_000));
/// ```
pub fn calculate_kpi_bonus(
    base_salary: Decimal,
    kpi_score: Decimal,
    tiers: &[BonusTier],
    step_number: u32,
) -> LedgerResult<BonusResult> {
    apply_tiers(
        base_salary,
        kpi_score,
        tiers,
        step_number,
        "kpi_bonus",
        "KPI Bonus",
        "kpi_score",
    )
}

/// Calculates the supervisor-rating bonus for a base salary.
///
/// With the default tiers: 90+ → 15%, 80+ → 10%, 70+ → 5%, otherwise nothing.
pub fn calculate_supervisor_bonus(
    base_salary: Decimal,
    supervisor_rating: Decimal,
    tiers: &[BonusTier],
    step_number: u32,
) -> LedgerResult<BonusResult> {
    apply_tiers(
        base_salary,
        supervisor_rating,
        tiers,
        step_number,
        "supervisor_bonus",
        "Supervisor Rating Bonus",
        "supervisor_rating",
    )
}

fn apply_tiers(
    base_salary: Decimal,
    score: Decimal,
    tiers: &[BonusTier],
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    score_field: &str,
) -> LedgerResult<BonusResult> {
    let tier = find_tier(score, tiers);
    let rate = tier.map_or(Decimal::ZERO, |t| t.rate);
    let amount = base_salary
        .checked_mul(rate)
        .ok_or_else(|| salary_overflow(rule_id))?;
    let percent = rate
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| salary_overflow(rule_id))?;

    let reasoning = match tier {
        Some(t) => format!(
            "{} {} reaches the {} tier: {}% of ${} = ${}",
            score_field,
            score.normalize(),
            t.min_score.normalize(),
            percent.normalize(),
            base_salary.normalize(),
            amount.normalize()
        ),
        None => format!(
            "{} {} is below every tier, no bonus",
            score_field,
            score.normalize()
        ),
    };

    let mut input = serde_json::Map::new();
    input.insert(
        "base_salary".to_string(),
        serde_json::Value::String(base_salary.normalize().to_string()),
    );
    input.insert(
        score_field.to_string(),
        serde_json::Value::String(score.normalize().to_string()),
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::Value::Object(input),
        output: serde_json::json!({
            "tier": tier.map(|t| t.min_score.normalize().to_string()),
            "rate": rate.normalize().to_string(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    Ok(BonusResult {
        amount,
        rate,
        audit_step,
    })
}
