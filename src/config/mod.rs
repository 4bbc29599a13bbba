//! Configuration loading and management for the workforce ledger.
//!
//! This module provides functionality to load the ledger configuration from
//! YAML: leave allotment and day counting, the lateness threshold, the
//! layoff-risk threshold, the fallback supervisor, and the compensation
//! tier tables.
//!
//! # Example
//!
//! ```no_run
//! use workforce_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Late after: {}", config.late_after());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    AttendanceConfig, BonusTier, CompensationConfig, LeaveConfig, LedgerConfig, PerformanceConfig,
    RegistryConfig,
};
