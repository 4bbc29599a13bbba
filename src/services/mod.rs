//! Ledger services.
//!
//! Each component of the ledger is a cheap-to-clone handle over a shared
//! [`LedgerContext`] (store, configuration, clock). The [`Ledger`] facade
//! wires them together and owns the store lifecycle.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use workforce_ledger::models::{NewEmployee, Role};
//! use workforce_ledger::services::Ledger;
//!
//! let ledger = Ledger::builder().open().unwrap();
//! let employee = ledger
//!     .registry()
//!     .onboard(NewEmployee {
//!         name: "Sari".to_string(),
//!         credential: "pw".to_string(),
//!         role: Role::IndividualContributor,
//!         division: "IT".to_string(),
//!         title: "Engineer".to_string(),
//!         hire_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
//!         base_salary: Decimal::from(1_000_000),
//!     })
//!     .unwrap();
//!
//! assert_eq!(employee.id, "EMP001");
//! assert_eq!(employee.remaining_leave_days, 12);
//! ```

mod attendance;
mod compensation;
mod leave;
mod performance;
mod registry;

pub use attendance::AttendanceTracker;
pub use compensation::CompensationEngine;
pub use leave::LeaveWorkflow;
pub use performance::{KpiCascade, PerformanceLedger};
pub use registry::{CredentialVerifier, EmployeeRegistry, PlainTextVerifier};

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ConfigLoader;
use crate::error::LedgerResult;
use crate::store::{LedgerStore, MemoryStore};

/// Shared dependencies of every service.
#[derive(Clone)]
pub struct LedgerContext {
    store: Arc<dyn LedgerStore>,
    config: Arc<ConfigLoader>,
    clock: Arc<dyn Clock>,
}

impl LedgerContext {
    /// Bundles a store, configuration and clock.
    pub fn new(store: Arc<dyn LedgerStore>, config: ConfigLoader, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config: Arc::new(config),
            clock,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The time source.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Builder for [`Ledger`]. Every dependency has a default: an in-memory
/// store, the built-in configuration, the system clock and plain-text
/// credential comparison.
#[derive(Default)]
pub struct LedgerBuilder {
    store: Option<Arc<dyn LedgerStore>>,
    config: Option<ConfigLoader>,
    clock: Option<Arc<dyn Clock>>,
    verifier: Option<Arc<dyn CredentialVerifier>>,
}

impl LedgerBuilder {
    /// Uses the given store instead of a fresh [`MemoryStore`].
    pub fn store(mut self, store: Arc<dyn LedgerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses the given configuration.
    pub fn config(mut self, config: ConfigLoader) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses the given clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Uses the given credential verifier.
    pub fn verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Opens the store and wires the services.
    pub fn open(self) -> LedgerResult<Ledger> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn LedgerStore>);
        store.open()?;

        let context = LedgerContext::new(
            store,
            self.config.unwrap_or_default(),
            self.clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
        );
        let verifier = self
            .verifier
            .unwrap_or_else(|| Arc::new(PlainTextVerifier) as Arc<dyn CredentialVerifier>);

        let registry = EmployeeRegistry::new(context.clone(), verifier);
        Ok(Ledger {
            attendance: AttendanceTracker::new(context.clone(), registry.clone()),
            performance: PerformanceLedger::new(context.clone(), registry.clone()),
            leave: LeaveWorkflow::new(context.clone(), registry.clone()),
            compensation: CompensationEngine::new(context.clone(), registry.clone()),
            registry,
            context,
        })
    }
}

/// Entry point to the Performance & Leave Ledger.
#[derive(Clone)]
pub struct Ledger {
    context: LedgerContext,
    registry: EmployeeRegistry,
    attendance: AttendanceTracker,
    performance: PerformanceLedger,
    leave: LeaveWorkflow,
    compensation: CompensationEngine,
}

impl Ledger {
    /// Starts building a ledger.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Closes the underlying store. Later calls fail with a storage error.
    pub fn close(&self) -> LedgerResult<()> {
        self.context.store().close()
    }

    /// Shared dependencies.
    pub fn context(&self) -> &LedgerContext {
        &self.context
    }

    /// Employee records and authentication.
    pub fn registry(&self) -> &EmployeeRegistry {
        &self.registry
    }

    /// Clock-in/out and lateness.
    pub fn attendance(&self) -> &AttendanceTracker {
        &self.attendance
    }

    /// KPI and evaluations.
    pub fn performance(&self) -> &PerformanceLedger {
        &self.performance
    }

    /// Leave requests and approvals.
    pub fn leave(&self) -> &LeaveWorkflow {
        &self.leave
    }

    /// Salaries and payroll snapshots.
    pub fn compensation(&self) -> &CompensationEngine {
        &self.compensation
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::LedgerError;
    use crate::models::Role;

    #[test]
    fn test_closed_ledger_reports_storage_error() {
        let ledger = ledger();
        let employee = hire(&ledger, "Sari", Role::IndividualContributor, "IT");
        ledger.close().unwrap();

        assert!(matches!(
            ledger.registry().get(&employee.id),
            Err(LedgerError::Storage { .. })
        ));
    }

    #[test]
    fn test_shared_store_is_visible_to_every_ledger() {
        let store: Arc<dyn LedgerStore> = Arc::new(MemoryStore::new());
        let first = Ledger::builder().store(Arc::clone(&store)).open().unwrap();
        let second = Ledger::builder().store(store).open().unwrap();

        let employee = hire(&first, "Sari", Role::IndividualContributor, "IT");
        assert_eq!(second.registry().get(&employee.id).unwrap().name, "Sari");
    }

    #[test]
    fn test_fresh_ledgers_are_isolated() {
        let first = ledger();
        let second = ledger();
        hire(&first, "Sari", Role::IndividualContributor, "IT");

        assert!(second.registry().list().unwrap().is_empty());
    }
}
