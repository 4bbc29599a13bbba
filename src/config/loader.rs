//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{MAX_SCORE, Role};

use super::types::{BonusTier, LedgerConfig};

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "ledger.yaml";

/// Loads and provides access to the ledger configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── ledger.yaml   # leave, attendance, performance, registry, compensation
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Leave allotment: {}", loader.config().leave.annual_allotment);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from `ledger.yaml` in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or out-of-range values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let file = path.as_ref().join(CONFIG_FILE_NAME);
        let path_str = file.display().to_string();

        let content = fs::read_to_string(&file).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text. `origin` is used in errors.
    pub fn from_yaml_str(content: &str, origin: &str) -> LedgerResult<Self> {
        let config: LedgerConfig =
            serde_yaml::from_str(content).map_err(|e| LedgerError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::from_config(config).map_err(|e| LedgerError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Validates an in-memory configuration and sorts its tier tables.
    pub fn from_config(mut config: LedgerConfig) -> LedgerResult<Self> {
        if config.leave.annual_allotment < 0 {
            return Err(LedgerError::validation(
                "leave.annual_allotment",
                "cannot be negative",
            ));
        }

        check_score("performance.risk_threshold", config.performance.risk_threshold)?;
        check_score("performance.initial_score", config.performance.initial_score)?;
        check_score(
            "compensation.penalty_threshold",
            config.compensation.penalty_threshold,
        )?;
        check_rate("compensation.penalty_rate", config.compensation.penalty_rate)?;

        // The layoff-risk flag and the salary penalty share one rule.
        if config.compensation.penalty_threshold != config.performance.risk_threshold {
            return Err(LedgerError::validation(
                "compensation.penalty_threshold",
                format!(
                    "must equal performance.risk_threshold ({}), got {}",
                    config.performance.risk_threshold, config.compensation.penalty_threshold
                ),
            ));
        }

        if Role::from_id(&config.registry.default_supervisor_id) != Some(Role::Supervisor) {
            return Err(LedgerError::validation(
                "registry.default_supervisor_id",
                format!(
                    "'{}' is not a supervisor id",
                    config.registry.default_supervisor_id
                ),
            ));
        }

        normalize_tiers("compensation.kpi_tiers", &mut config.compensation.kpi_tiers)?;
        normalize_tiers(
            "compensation.supervisor_tiers",
            &mut config.compensation.supervisor_tiers,
        )?;

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Days of leave a new hire starts with.
    pub fn leave_allotment(&self) -> i32 {
        self.config.leave.annual_allotment
    }

    /// Clock-ins strictly after this time are late.
    pub fn late_after(&self) -> NaiveTime {
        self.config.attendance.late_after
    }

    /// Scores strictly below this flag a layoff risk.
    pub fn risk_threshold(&self) -> Decimal {
        self.config.performance.risk_threshold
    }
}

fn check_score(field: &str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO || value > MAX_SCORE {
        return Err(LedgerError::validation(
            field,
            format!("must be between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}

fn check_rate(field: &str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(LedgerError::validation(
            field,
            format!("must be between 0 and 1, got {}", value),
        ));
    }
    Ok(())
}

/// Validates every tier and orders the table highest bound first, which is
/// the order tier lookup walks it in.
fn normalize_tiers(field: &str, tiers: &mut [BonusTier]) -> LedgerResult<()> {
    for tier in tiers.iter() {
        check_score(field, tier.min_score)?;
        check_rate(field, tier.rate)?;
    }
    tiers.sort_by(|a, b| b.min_score.cmp(&a.min_score));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.leave_allotment(), 12);
        assert_eq!(loader.late_after(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(loader.risk_threshold(), dec("60"));
    }

    #[test]
    fn test_loaded_tiers_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = ConfigLoader::default();

        assert_eq!(
            loader.config().compensation,
            defaults.config().compensation
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(LedgerError::ConfigNotFound { path }) => {
                assert!(path.contains("ledger.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("leave: [unclosed", "inline");
        match result {
            Err(LedgerError::ConfigParseError { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_tiers_are_sorted_highest_first() {
        let yaml = r#"
compensation:
  kpi_tiers:
    - { min_score: "60", rate: "0.05" }
    - { min_score: "90", rate: "0.20" }
    - { min_score: "75", rate: "0.10" }
"#;
        let loader = ConfigLoader::from_yaml_str(yaml, "inline").unwrap();
        let bounds: Vec<Decimal> = loader
            .config()
            .compensation
            .kpi_tiers
            .iter()
            .map(|t| t.min_score)
            .collect();

        assert_eq!(bounds, vec![dec("90"), dec("75"), dec("60")]);
    }

    #[test]
    fn test_rate_above_one_is_rejected() {
        let yaml = "compensation:\n  penalty_rate: \"1.5\"\n";
        assert!(matches!(
            ConfigLoader::from_yaml_str(yaml, "inline"),
            Err(LedgerError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_default_supervisor_must_be_supervisor_id() {
        let yaml = "registry:\n  default_supervisor_id: \"MNG001\"\n";
        let result = ConfigLoader::from_yaml_str(yaml, "inline");
        match result {
            Err(LedgerError::ConfigParseError { message, .. }) => {
                assert!(message.contains("MNG001"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_allotment_is_rejected() {
        let yaml = "leave:\n  annual_allotment: -1\n";
        assert!(ConfigLoader::from_yaml_str(yaml, "inline").is_err());
    }

    #[test]
    fn test_thresholds_must_agree() {
        let yaml = "performance:\n  risk_threshold: \"50\"\ncompensation:\n  penalty_threshold: \"60\"\n";
        match ConfigLoader::from_yaml_str(yaml, "inline") {
            Err(LedgerError::ConfigParseError { message, .. }) => {
                assert!(message.contains("compensation.penalty_threshold"), "{}", message);
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        let yaml = "performance:\n  risk_threshold: \"50\"\ncompensation:\n  penalty_threshold: \"50\"\n";
        let loader = ConfigLoader::from_yaml_str(yaml, "inline").unwrap();
        assert_eq!(loader.risk_threshold(), dec("50"));
    }
}
