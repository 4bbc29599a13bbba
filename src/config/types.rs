//! Configuration types for the ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `ledger.yaml`. Every section has defaults, so a
//! file only needs to name the values it overrides.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a bonus tier table.
///
/// A score at or above `min_score` earns `rate` times base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTier {
    /// Inclusive lower bound of the tier.
    pub min_score: Decimal,
    /// Fraction of base salary paid (e.g. 0.15).
    pub rate: Decimal,
}

impl BonusTier {
    /// Creates a tier from whole-number score and percent.
    pub fn percent(min_score: i64, percent: i64) -> Self {
        Self {
            min_score: Decimal::from(min_score),
            rate: Decimal::new(percent, 2),
        }
    }
}

/// Leave accounting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveConfig {
    /// Days of leave a new hire starts with.
    pub annual_allotment: i32,
    /// Count only Monday through Friday when sizing a request.
    pub exclude_weekends: bool,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            annual_allotment: 12,
            exclude_weekends: false,
        }
    }
}

/// Attendance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Clock-ins strictly after this time are late.
    #[serde(with = "hhmm")]
    pub late_after: NaiveTime,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            late_after: NaiveTime::from_hms_opt(8, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Score cascade settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Scores strictly below this flag the employee as a layoff risk.
    pub risk_threshold: Decimal,
    /// KPI score and supervisor rating given to new hires.
    pub initial_score: Decimal,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            risk_threshold: Decimal::from(60),
            initial_score: Decimal::ZERO,
        }
    }
}

/// Employee registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Returned by supervisor resolution when a division has no supervisor.
    pub default_supervisor_id: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_supervisor_id: "SUP001".to_string(),
        }
    }
}

/// Compensation tier tables and penalty rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationConfig {
    /// KPI bonus tiers.
    pub kpi_tiers: Vec<BonusTier>,
    /// Supervisor-rating bonus tiers.
    pub supervisor_tiers: Vec<BonusTier>,
    /// Either score strictly below this triggers the penalty.
    pub penalty_threshold: Decimal,
    /// Fraction of base salary deducted as penalty.
    pub penalty_rate: Decimal,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            kpi_tiers: vec![
                BonusTier::percent(90, 20),
                BonusTier::percent(80, 15),
                BonusTier::percent(70, 10),
                BonusTier::percent(60, 5),
            ],
            supervisor_tiers: vec![
                BonusTier::percent(90, 15),
                BonusTier::percent(80, 10),
                BonusTier::percent(70, 5),
            ],
            penalty_threshold: Decimal::from(60),
            penalty_rate: Decimal::new(10, 2),
        }
    }
}

/// The complete ledger configuration loaded from `ledger.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leave accounting.
    pub leave: LeaveConfig,
    /// Attendance.
    pub attendance: AttendanceConfig,
    /// Score cascade.
    pub performance: PerformanceConfig,
    /// Employee registry.
    pub registry: RegistryConfig,
    /// Compensation.
    pub compensation: CompensationConfig,
}

/// `HH:MM` (de)serialization for [`NaiveTime`] settings.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map_err(|e| D::Error::custom(format!("expected HH:MM, got '{}': {}", raw, e)))
    }
}
