//! HTTP API module for the workforce ledger.
//!
//! This module exposes the ledger operations as JSON endpoints for the
//! presentation layer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ClockRequest, DecisionRequest, EvaluationRequest, KpiRequest, LeaveSubmission, LoginRequest,
    MonthYear, MonthlyEvaluationRequest, UpdateEmployeeRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
