//! KPI and evaluation records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;
use crate::error::{LedgerError, LedgerResult};

/// Highest score any KPI or evaluation field may hold.
pub const MAX_SCORE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Checks that a score lies in 0..=100.
///
/// ```
/// use rust_decimal::Decimal;
/// use workforce_ledger::models::validate_score;
///
/// assert!(validate_score("overall", Decimal::from(100)).is_ok());
/// assert!(validate_score("overall", Decimal::from(-1)).is_err());
/// ```
pub fn validate_score(field: &str, score: Decimal) -> LedgerResult<Decimal> {
    if score.is_sign_negative() && !score.is_zero() {
        return Err(LedgerError::validation(
            field,
            format!("score cannot be negative, got {}", score),
        ));
    }
    if score > MAX_SCORE {
        return Err(LedgerError::validation(
            field,
            format!("score cannot exceed 100, got {}", score),
        ));
    }
    Ok(score)
}

/// Division-wide KPI for one period. One record per `(division, period)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiRecord {
    /// The division the score applies to.
    pub division: String,
    /// The month the score covers.
    pub period: Period,
    /// The KPI score (0-100).
    pub score: Decimal,
    /// The manager who submitted the score.
    pub recorded_by: String,
    /// When the score was (last) submitted.
    pub created_at: DateTime<Utc>,
    /// Optional remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An ad-hoc supervisor evaluation. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Record id.
    pub id: Uuid,
    /// The evaluated employee.
    pub employee_id: String,
    /// The evaluator.
    pub supervisor_id: String,
    /// Punctuality score (0-100).
    pub punctuality_score: Decimal,
    /// Attendance score (0-100).
    pub attendance_score: Decimal,
    /// Overall rating (0-100); becomes the employee's supervisor rating.
    pub overall_rating: Decimal,
    /// Free-text remarks.
    pub comments: String,
    /// When the evaluation was recorded.
    pub created_at: DateTime<Utc>,
}

/// A periodic evaluation. At most one per `(employee_id, period)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEvaluationRecord {
    /// Record id.
    pub id: Uuid,
    /// The evaluated employee.
    pub employee_id: String,
    /// The evaluator.
    pub supervisor_id: String,
    /// The month being evaluated.
    pub period: Period,
    /// Punctuality score (0-100).
    pub punctuality_score: Decimal,
    /// Attendance score (0-100).
    pub attendance_score: Decimal,
    /// Productivity score (0-100).
    pub productivity_score: Decimal,
    /// Overall rating (0-100); becomes the employee's supervisor rating.
    pub overall_rating: Decimal,
    /// Free-text remarks.
    pub comments: String,
    /// When the evaluation was recorded.
    pub created_at: DateTime<Utc>,
}

/// Scores submitted with an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScores {
    /// Punctuality score (0-100).
    pub punctuality: Decimal,
    /// Attendance score (0-100).
    pub attendance: Decimal,
    /// Productivity score (0-100). Ignored by ad-hoc evaluations.
    #[serde(default)]
    pub productivity: Decimal,
    /// Overall rating (0-100).
    pub overall: Decimal,
}

impl EvaluationScores {
    /// Validates every score field.
    pub fn validate(&self) -> LedgerResult<()> {
        validate_score("punctuality", self.punctuality)?;
        validate_score("attendance", self.attendance)?;
        validate_score("productivity", self.productivity)?;
        validate_score("overall", self.overall)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score("kpi", dec("0")).is_ok());
        assert!(validate_score("kpi", dec("100.0")).is_ok());
        assert!(validate_score("kpi", dec("72.5")).is_ok());
        assert!(validate_score("kpi", dec("-0.5")).is_err());
        assert!(validate_score("kpi", dec("100.01")).is_err());
    }

    #[test]
    fn test_validate_score_names_the_field() {
        match validate_score("punctuality", dec("120")) {
            Err(LedgerError::Validation { field, .. }) => assert_eq!(field, "punctuality"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluation_scores_validate_each_field() {
        let scores = EvaluationScores {
            punctuality: dec("90"),
            attendance: dec("85"),
            productivity: dec("101"),
            overall: dec("88"),
        };
        match scores.validate() {
            Err(LedgerError::Validation { field, .. }) => assert_eq!(field, "productivity"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_productivity_defaults_to_zero() {
        let json = r#"{"punctuality": "90", "attendance": "80", "overall": "85"}"#;
        let scores: EvaluationScores = serde_json::from_str(json).unwrap();
        assert_eq!(scores.productivity, Decimal::ZERO);
        assert!(scores.validate().is_ok());
    }
}
