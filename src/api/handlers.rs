//! HTTP request handlers for the workforce ledger API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler tags its log lines with a fresh correlation id.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::{
    AttendanceRecord, Employee, EvaluationRecord, LeaveRequest, MonthlyEvaluationRecord,
    NewEmployee, SalaryBreakdown, SalaryHistoryRecord,
};
use crate::services::KpiCascade;

use super::request::{
    ClockRequest, DecisionRequest, EvaluationRequest, KpiRequest, LeaveSubmission, LoginRequest,
    MonthYear, MonthlyEvaluationRequest, UpdateEmployeeRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/employees", post(onboard_handler))
        .route(
            "/employees/:id",
            get(get_employee_handler).put(update_employee_handler),
        )
        .route("/employees/:id/attendance", get(attendance_history_handler))
        .route("/employees/:id/leave", get(employee_leave_handler))
        .route("/employees/:id/salary", get(salary_handler))
        .route(
            "/employees/:id/salary/snapshots",
            post(salary_snapshot_handler),
        )
        .route("/employees/:id/salary/history", get(salary_history_handler))
        .route(
            "/divisions/:division/employees",
            get(division_employees_handler),
        )
        .route(
            "/divisions/:division/supervisor",
            get(division_supervisor_handler),
        )
        .route("/attendance/clock-in", post(clock_in_handler))
        .route("/attendance/clock-out", post(clock_out_handler))
        .route("/kpi", post(kpi_handler))
        .route("/kpi/averages", get(kpi_averages_handler))
        .route("/evaluations", post(evaluation_handler))
        .route("/evaluations/monthly", post(monthly_evaluation_handler))
        .route("/leave", post(submit_leave_handler))
        .route("/leave/:id/approve", post(approve_leave_handler))
        .route("/leave/:id/reject", post(reject_leave_handler))
        .route("/leave/approvals/:approver_id", get(approval_queue_handler))
        .with_state(state)
}

/// Response body of `GET /divisions/:division/supervisor`.
#[derive(Debug, Serialize)]
struct SupervisorResponse {
    division: String,
    supervisor_id: String,
}

fn start(operation: &'static str) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation, "Processing request");
    correlation_id
}

fn ok<T>(status: StatusCode, body: T) -> ApiResult<T> {
    Ok((status, Json(body)))
}

/// Logs a ledger error against the request and converts it.
fn failed(correlation_id: Uuid) -> impl Fn(LedgerError) -> ApiErrorResponse {
    move |error| {
        warn!(correlation_id = %correlation_id, error = %error, "Request failed");
        error.into()
    }
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn request_id(correlation_id: Uuid, raw: &str) -> Result<Uuid, ApiErrorResponse> {
    Uuid::parse_str(raw)
        .map_err(|_| LedgerError::validation("id", format!("'{}' is not a request id", raw)))
        .map_err(failed(correlation_id))
}

/// Handler for POST /auth/login.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = start("login");
    let request = body(correlation_id, payload)?;

    let employee = state
        .ledger()
        .registry()
        .authenticate(&request.id, &request.credential)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, employee)
}

/// Handler for POST /employees.
async fn onboard_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = start("onboard");
    let request = body(correlation_id, payload)?;

    let employee = state
        .ledger()
        .registry()
        .onboard(request)
        .map_err(failed(correlation_id))?;
    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Employee created");
    ok(StatusCode::CREATED, employee)
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let correlation_id = start("get_employee");
    let employee = state
        .ledger()
        .registry()
        .get(&id)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, employee)
}

/// Handler for PUT /employees/:id.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = start("update_employee");
    let request = body(correlation_id, payload)?;
    let registry = state.ledger().registry();

    let current = registry.get(&id).map_err(failed(correlation_id))?;
    let employee = registry
        .update(request.apply(current))
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, employee)
}

/// Handler for GET /divisions/:division/employees.
async fn division_employees_handler(
    State(state): State<AppState>,
    Path(division): Path<String>,
) -> ApiResult<Vec<Employee>> {
    let correlation_id = start("list_by_division");
    let employees = state
        .ledger()
        .registry()
        .list_by_division(&division)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, employees)
}

/// Handler for GET /divisions/:division/supervisor.
async fn division_supervisor_handler(
    State(state): State<AppState>,
    Path(division): Path<String>,
) -> Result<(StatusCode, Json<SupervisorResponse>), ApiErrorResponse> {
    let correlation_id = start("resolve_supervisor");
    let supervisor_id = state
        .ledger()
        .registry()
        .resolve_supervisor(&division)
        .map_err(failed(correlation_id))?;
    ok(
        StatusCode::OK,
        SupervisorResponse {
            division,
            supervisor_id,
        },
    )
}

/// Handler for POST /attendance/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<AttendanceRecord> {
    let correlation_id = start("clock_in");
    let request = body(correlation_id, payload)?;
    let ledger = state.ledger();

    let date = request
        .date
        .unwrap_or_else(|| ledger.context().clock().today());
    let record = ledger
        .attendance()
        .clock_in(&request.employee_id, date, &request.time)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::CREATED, record)
}

/// Handler for POST /attendance/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<AttendanceRecord> {
    let correlation_id = start("clock_out");
    let request = body(correlation_id, payload)?;
    let attendance = state.ledger().attendance();

    let record = match request.date {
        Some(date) => attendance.clock_out_on(&request.employee_id, date, &request.time),
        None => attendance.clock_out(&request.employee_id, &request.time),
    }
    .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, record)
}

/// Handler for GET /employees/:id/attendance.
async fn attendance_history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let correlation_id = start("attendance_history");
    let ledger = state.ledger();

    ledger.registry().get(&id).map_err(failed(correlation_id))?;
    let records = ledger
        .attendance()
        .history(&id)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, records)
}

/// Handler for POST /kpi.
async fn kpi_handler(
    State(state): State<AppState>,
    payload: Result<Json<KpiRequest>, JsonRejection>,
) -> ApiResult<KpiCascade> {
    let correlation_id = start("set_division_kpi");
    let request = body(correlation_id, payload)?;

    let period = request.period.period().map_err(failed(correlation_id))?;
    let cascade = state
        .ledger()
        .performance()
        .set_division_kpi(
            &request.division,
            period,
            request.score,
            &request.manager_id,
            request.notes,
        )
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, cascade)
}

/// Handler for GET /kpi/averages.
async fn kpi_averages_handler(
    State(state): State<AppState>,
) -> ApiResult<BTreeMap<String, Decimal>> {
    let correlation_id = start("average_kpi_by_division");
    let averages = state
        .ledger()
        .performance()
        .average_kpi_by_division()
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, averages)
}

/// Handler for POST /evaluations.
async fn evaluation_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> ApiResult<EvaluationRecord> {
    let correlation_id = start("record_evaluation");
    let request = body(correlation_id, payload)?;

    let record = state
        .ledger()
        .performance()
        .record_evaluation(
            &request.employee_id,
            &request.supervisor_id,
            request.scores,
            &request.comments,
        )
        .map_err(failed(correlation_id))?;
    ok(StatusCode::CREATED, record)
}

/// Handler for POST /evaluations/monthly.
async fn monthly_evaluation_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyEvaluationRequest>, JsonRejection>,
) -> ApiResult<MonthlyEvaluationRecord> {
    let correlation_id = start("record_monthly_evaluation");
    let request = body(correlation_id, payload)?;

    let period = request.period.period().map_err(failed(correlation_id))?;
    let record = state
        .ledger()
        .performance()
        .record_monthly_evaluation(
            &request.employee_id,
            &request.supervisor_id,
            period,
            request.scores,
            &request.comments,
        )
        .map_err(failed(correlation_id))?;
    ok(StatusCode::CREATED, record)
}

/// Handler for POST /leave.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveSubmission>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = start("submit_leave");
    let request = body(correlation_id, payload)?;

    let leave = state
        .ledger()
        .leave()
        .submit(
            &request.employee_id,
            &request.leave_type,
            request.start_date,
            request.end_date,
            &request.reason,
        )
        .map_err(failed(correlation_id))?;
    ok(StatusCode::CREATED, leave)
}

/// Handler for POST /leave/:id/approve.
async fn approve_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = start("approve_leave");
    let request = body(correlation_id, payload)?;
    let id = request_id(correlation_id, &id)?;

    let leave = state
        .ledger()
        .leave()
        .approve(id, &request.approver_id, request.notes)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, leave)
}

/// Handler for POST /leave/:id/reject.
async fn reject_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> ApiResult<LeaveRequest> {
    let correlation_id = start("reject_leave");
    let request = body(correlation_id, payload)?;
    let id = request_id(correlation_id, &id)?;

    let leave = state
        .ledger()
        .leave()
        .reject(id, &request.approver_id, request.notes)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, leave)
}

/// Handler for GET /leave/approvals/:approver_id.
async fn approval_queue_handler(
    State(state): State<AppState>,
    Path(approver_id): Path<String>,
) -> ApiResult<Vec<LeaveRequest>> {
    let correlation_id = start("list_for_approval");
    let queue = state
        .ledger()
        .leave()
        .list_for_approval(&approver_id)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, queue)
}

/// Handler for GET /employees/:id/leave.
async fn employee_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<LeaveRequest>> {
    let correlation_id = start("list_leave_by_employee");
    let ledger = state.ledger();

    ledger.registry().get(&id).map_err(failed(correlation_id))?;
    let requests = ledger
        .leave()
        .list_by_employee(&id)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, requests)
}

/// Handler for GET /employees/:id/salary.
async fn salary_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SalaryBreakdown> {
    let correlation_id = start("compute_monthly_salary");
    let salary = state
        .ledger()
        .compensation()
        .salary_for(&id)
        .map_err(failed(correlation_id))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %id,
        total = %salary.total_salary,
        "Salary computed"
    );
    ok(StatusCode::OK, salary)
}

/// Handler for POST /employees/:id/salary/snapshots.
async fn salary_snapshot_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MonthYear>, JsonRejection>,
) -> ApiResult<SalaryHistoryRecord> {
    let correlation_id = start("record_salary_snapshot");
    let request = body(correlation_id, payload)?;

    let period = request.period().map_err(failed(correlation_id))?;
    let record = state
        .ledger()
        .compensation()
        .record_salary_snapshot(&id, period)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::CREATED, record)
}

/// Handler for GET /employees/:id/salary/history.
async fn salary_history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<SalaryHistoryRecord>> {
    let correlation_id = start("salary_history");
    let ledger = state.ledger();

    ledger.registry().get(&id).map_err(failed(correlation_id))?;
    let history = ledger
        .compensation()
        .salary_history(&id)
        .map_err(failed(correlation_id))?;
    ok(StatusCode::OK, history)
}
