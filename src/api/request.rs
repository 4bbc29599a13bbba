//! Request types for the workforce ledger API.
//!
//! Bodies that map one-to-one onto a domain input ([`NewEmployee`],
//! [`EvaluationScores`]) reuse the domain type; the rest are defined here.
//!
//! [`NewEmployee`]: crate::models::NewEmployee

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::models::{Employee, EvaluationScores, Period};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Employee id.
    pub id: String,
    /// Presented credential.
    pub credential: String,
}

/// Body of `PUT /employees/:id`. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New credential.
    #[serde(default)]
    pub credential: Option<String>,
    /// New division.
    #[serde(default)]
    pub division: Option<String>,
    /// New job title.
    #[serde(default)]
    pub title: Option<String>,
    /// New leave balance.
    #[serde(default)]
    pub remaining_leave_days: Option<i32>,
    /// New monthly base pay.
    #[serde(default)]
    pub base_salary: Option<Decimal>,
    /// New KPI score.
    #[serde(default)]
    pub kpi_score: Option<Decimal>,
    /// New supervisor rating.
    #[serde(default)]
    pub supervisor_rating: Option<Decimal>,
}

impl UpdateEmployeeRequest {
    /// Overlays the provided fields onto `employee`.
    pub fn apply(self, mut employee: Employee) -> Employee {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(credential) = self.credential {
            employee.credential = credential;
        }
        if let Some(division) = self.division {
            employee.division = division;
        }
        if let Some(title) = self.title {
            employee.title = title;
        }
        if let Some(days) = self.remaining_leave_days {
            employee.remaining_leave_days = days;
        }
        if let Some(base_salary) = self.base_salary {
            employee.base_salary = base_salary;
        }
        if let Some(kpi_score) = self.kpi_score {
            employee.kpi_score = kpi_score;
        }
        if let Some(rating) = self.supervisor_rating {
            employee.supervisor_rating = rating;
        }
        employee
    }
}

/// Body of `POST /attendance/clock-in` and `POST /attendance/clock-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// Employee clocking.
    pub employee_id: String,
    /// `HH:MM`.
    pub time: String,
    /// Day of the record; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// A month given as separate fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthYear {
    /// 1 through 12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl MonthYear {
    /// Validates into a [`Period`].
    pub fn period(self) -> LedgerResult<Period> {
        Period::new(self.month, self.year)
    }
}

/// Body of `POST /kpi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiRequest {
    /// Division the score applies to.
    pub division: String,
    /// Month of the score.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Score from 0 to 100.
    pub score: Decimal,
    /// Submitting manager.
    pub manager_id: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /evaluations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Employee being evaluated.
    pub employee_id: String,
    /// Evaluating supervisor or manager.
    pub supervisor_id: String,
    /// Score components.
    pub scores: EvaluationScores,
    /// Free-form comments.
    #[serde(default)]
    pub comments: String,
}

/// Body of `POST /evaluations/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyEvaluationRequest {
    /// Employee being evaluated.
    pub employee_id: String,
    /// Evaluating supervisor or manager.
    pub supervisor_id: String,
    /// Month evaluated.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Score components.
    pub scores: EvaluationScores,
    /// Free-form comments.
    #[serde(default)]
    pub comments: String,
}

/// Body of `POST /leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSubmission {
    /// Requesting employee.
    pub employee_id: String,
    /// Kind of leave (annual, sick, ...).
    pub leave_type: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Free-form reason.
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /leave/:id/approve` and `POST /leave/:id/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Deciding employee.
    pub approver_id: String,
    /// Notes stored with the decision.
    #[serde(default)]
    pub notes: Option<String>,
}
