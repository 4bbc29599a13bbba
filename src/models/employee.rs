//! Employee model and related types.
//!
//! This module defines the [`Employee`] record, the closed [`Role`]
//! hierarchy used for approval routing, and the layoff-risk rule that ties
//! an employee's denormalized scores together.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of an employee in the three-tier hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Rank-and-file employee; the only role that receives division KPI.
    IndividualContributor,
    /// Approves leave for individual contributors in their own division.
    Supervisor,
    /// Approves leave for supervisors and individual contributors everywhere.
    Manager,
}

impl Role {
    /// All roles, lowest tier first.
    pub const ALL: [Role; 3] = [Role::IndividualContributor, Role::Supervisor, Role::Manager];

    /// The prefix every employee id of this role starts with.
    ///
    /// ```
    /// use workforce_ledger::models::Role;
    ///
    /// assert_eq!(Role::Supervisor.id_prefix(), "SUP");
    /// ```
    pub fn id_prefix(self) -> &'static str {
        match self {
            Role::IndividualContributor => "EMP",
            Role::Supervisor => "SUP",
            Role::Manager => "MNG",
        }
    }

    /// Infers the role from a role-prefixed employee id.
    pub fn from_id(id: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| id.starts_with(role.id_prefix()))
    }
}

/// Soft lifecycle of an employee record. Records are never hard-deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed.
    #[default]
    Active,
    /// Left the organization; kept for history.
    Inactive,
}

/// Returns true when either score falls below the risk threshold.
///
/// ```
/// use rust_decimal::Decimal;
/// use workforce_ledger::models::is_layoff_risk;
///
/// let threshold = Decimal::from(60);
/// assert!(is_layoff_risk(Decimal::from(59), Decimal::from(95), threshold));
/// assert!(!is_layoff_risk(Decimal::from(60), Decimal::from(60), threshold));
/// ```
pub fn is_layoff_risk(kpi_score: Decimal, supervisor_rating: Decimal, threshold: Decimal) -> bool {
    kpi_score < threshold || supervisor_rating < threshold
}

/// Canonical employee record.
///
/// `kpi_score`, `supervisor_rating` and `layoff_risk` are denormalized from
/// the performance ledger; `remaining_leave_days` is owned by the leave
/// workflow. Writes are last-write-wins on the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Role-prefixed identifier (e.g. "EMP001").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stored credential, checked by a [`CredentialVerifier`](crate::services::CredentialVerifier).
    #[serde(default, skip_serializing)]
    pub credential: String,
    /// Position in the hierarchy.
    pub role: Role,
    /// Organizational unit used for KPI scoping and approval routing.
    pub division: String,
    /// Job title.
    pub title: String,
    /// The date the employee joined.
    pub hire_date: NaiveDate,
    /// Leave days left; may go negative after approvals.
    pub remaining_leave_days: i32,
    /// Monthly base pay.
    pub base_salary: Decimal,
    /// Latest division KPI broadcast to this employee (0-100).
    pub kpi_score: Decimal,
    /// Latest overall rating from an evaluation (0-100).
    pub supervisor_rating: Decimal,
    /// Derived from the two scores on every score write.
    pub layoff_risk: bool,
    /// Soft lifecycle flag.
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employee {
    /// Returns true if the employee has not been deactivated.
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }

    /// Re-derives `layoff_risk` from the current scores.
    pub fn recompute_layoff_risk(&mut self, threshold: Decimal) {
        self.layoff_risk = is_layoff_risk(self.kpi_score, self.supervisor_rating, threshold);
    }

    /// Sets the KPI score and re-derives `layoff_risk`.
    pub fn apply_kpi_score(&mut self, score: Decimal, threshold: Decimal) {
        self.kpi_score = score;
        self.recompute_layoff_risk(threshold);
    }

    /// Sets the supervisor rating and re-derives `layoff_risk`.
    pub fn apply_supervisor_rating(&mut self, rating: Decimal, threshold: Decimal) {
        self.supervisor_rating = rating;
        self.recompute_layoff_risk(threshold);
    }
}

/// Onboarding input for a new employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Display name.
    pub name: String,
    /// Initial credential.
    pub credential: String,
    /// Position in the hierarchy; decides the id prefix.
    pub role: Role,
    /// Organizational unit.
    pub division: String,
    /// Job title.
    #[serde(default)]
    pub title: String,
    /// The date the employee joined.
    pub hire_date: NaiveDate,
    /// Monthly base pay.
    pub base_salary: Decimal,
}
