//! Employee registry: canonical employee records, authentication and
//! supervisor resolution.

use std::sync::Arc;

use rust_decimal::Decimal;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, EmploymentStatus, NewEmployee, Role, validate_score};

use super::LedgerContext;

/// Attempts at allocating a fresh id before giving up.
const ID_ALLOCATION_ATTEMPTS: usize = 5;

/// Compares a presented credential with the stored one.
pub trait CredentialVerifier: Send + Sync {
    /// Returns true if `presented` matches `stored`.
    fn verify(&self, stored: &str, presented: &str) -> bool;
}

/// Plain equality, compared in constant time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextVerifier;

impl CredentialVerifier for PlainTextVerifier {
    fn verify(&self, stored: &str, presented: &str) -> bool {
        bool::from(stored.as_bytes().ct_eq(presented.as_bytes()))
    }
}

/// Source of role and division for every other component.
#[derive(Clone)]
pub struct EmployeeRegistry {
    context: LedgerContext,
    verifier: Arc<dyn CredentialVerifier>,
}

impl EmployeeRegistry {
    pub(crate) fn new(context: LedgerContext, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { context, verifier }
    }

    /// Returns the employee if `credential` matches and the employee is active.
    ///
    /// Unknown ids and wrong credentials produce the same error.
    pub fn authenticate(&self, id: &str, credential: &str) -> LedgerResult<Employee> {
        let denied = || LedgerError::Authentication { id: id.to_string() };

        let employee = self.context.store().get_employee(id)?.ok_or_else(denied)?;
        if !employee.is_active() || !self.verifier.verify(&employee.credential, credential) {
            warn!(employee_id = %id, "Authentication failed");
            return Err(denied());
        }

        info!(employee_id = %id, role = ?employee.role, "Employee authenticated");
        Ok(employee)
    }

    /// Returns a copy of the employee.
    pub fn get(&self, id: &str) -> LedgerResult<Employee> {
        self.context
            .store()
            .get_employee(id)?
            .ok_or_else(|| LedgerError::not_found("employee", id))
    }

    /// All employees ordered by id.
    pub fn list(&self) -> LedgerResult<Vec<Employee>> {
        self.context.store().list_employees()
    }

    /// Employees of a division ordered by id.
    pub fn list_by_division(&self, division: &str) -> LedgerResult<Vec<Employee>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.division == division)
            .collect())
    }

    /// Replaces the whole record (last write wins).
    ///
    /// `layoff_risk` is re-derived from the written scores, so callers
    /// cannot store an inconsistent flag.
    pub fn update(&self, mut employee: Employee) -> LedgerResult<Employee> {
        validate_employee(&employee)?;
        employee.recompute_layoff_risk(self.context.config().risk_threshold());

        self.context.store().save_employee(employee.clone())?;
        debug!(employee_id = %employee.id, "Employee record replaced");
        Ok(employee)
    }

    /// The first active supervisor of `division` by id, or the configured
    /// default supervisor when the division has none.
    pub fn resolve_supervisor(&self, division: &str) -> LedgerResult<String> {
        let found = self
            .list_by_division(division)?
            .into_iter()
            .find(|e| e.role == Role::Supervisor && e.is_active());

        match found {
            Some(supervisor) => Ok(supervisor.id),
            None => {
                let fallback = self
                    .context
                    .config()
                    .config()
                    .registry
                    .default_supervisor_id
                    .clone();
                warn!(
                    division = %division,
                    fallback = %fallback,
                    "No supervisor in division, using default supervisor"
                );
                Ok(fallback)
            }
        }
    }

    /// Creates a new employee with the next free role-prefixed id.
    pub fn onboard(&self, new: NewEmployee) -> LedgerResult<Employee> {
        let config = self.context.config();
        let initial_score = config.config().performance.initial_score;

        let mut employee = Employee {
            id: String::new(),
            name: new.name,
            credential: new.credential,
            role: new.role,
            division: new.division,
            title: new.title,
            hire_date: new.hire_date,
            remaining_leave_days: config.leave_allotment(),
            base_salary: new.base_salary,
            kpi_score: initial_score,
            supervisor_rating: initial_score,
            layoff_risk: false,
            status: EmploymentStatus::Active,
        };
        employee.recompute_layoff_risk(config.risk_threshold());

        for _ in 0..ID_ALLOCATION_ATTEMPTS {
            employee.id = self.next_id(employee.role)?;
            validate_employee(&employee)?;

            match self.context.store().insert_employee(employee.clone()) {
                Ok(()) => {
                    info!(
                        employee_id = %employee.id,
                        role = ?employee.role,
                        division = %employee.division,
                        "Employee onboarded"
                    );
                    return Ok(employee);
                }
                Err(LedgerError::Duplicate { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::storage(format!(
            "could not allocate a {} id",
            employee.role.id_prefix()
        )))
    }

    /// Marks an employee inactive. The record is kept.
    pub fn deactivate(&self, id: &str) -> LedgerResult<Employee> {
        let mut employee = self.get(id)?;
        employee.status = EmploymentStatus::Inactive;
        self.context.store().save_employee(employee.clone())?;
        info!(employee_id = %id, "Employee deactivated");
        Ok(employee)
    }

    fn next_id(&self, role: Role) -> LedgerResult<String> {
        let prefix = role.id_prefix();
        let highest = self
            .list()?
            .iter()
            .filter_map(|e| e.id.strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{}{:03}", prefix, highest + 1))
    }
}

fn validate_employee(employee: &Employee) -> LedgerResult<()> {
    if employee.name.trim().is_empty() {
        return Err(LedgerError::validation("name", "cannot be empty"));
    }
    if employee.division.trim().is_empty() {
        return Err(LedgerError::validation("division", "cannot be empty"));
    }
    if Role::from_id(&employee.id) != Some(employee.role) {
        return Err(LedgerError::validation(
            "id",
            format!(
                "'{}' must start with {} for role {:?}",
                employee.id,
                employee.role.id_prefix(),
                employee.role
            ),
        ));
    }
    if employee.base_salary < Decimal::ZERO {
        return Err(LedgerError::validation("base_salary", "cannot be negative"));
    }
    validate_score("kpi_score", employee.kpi_score)?;
    validate_score("supervisor_rating", employee.supervisor_rating)?;
    Ok(())
}
