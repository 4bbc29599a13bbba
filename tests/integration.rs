//! Integration tests for the workforce ledger HTTP API.
//!
//! This test suite drives the ledger end to end through the router:
//! - Onboarding and authentication
//! - KPI broadcast and the layoff-risk flag
//! - Monthly evaluation duplicate rejection
//! - Leave approval, rejection, balances and routing
//! - Compensation tiers and salary snapshots
//! - Attendance lateness boundary
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use workforce_ledger::api::{AppState, create_router};
use workforce_ledger::config::ConfigLoader;
use workforce_ledger::services::Ledger;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let ledger = Ledger::builder()
        .config(config)
        .open()
        .expect("Failed to open ledger");
    AppState::new(ledger)
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn field(json: &Value, name: &str) -> Decimal {
    decimal(json[name].as_str().expect("decimal fields are strings"))
}

async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let router: Router = create_router(state.clone());
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn post(state: &AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    send(state, "POST", uri, Some(body)).await
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    send(state, "GET", uri, None).await
}

async fn onboard(state: &AppState, name: &str, role: &str, division: &str) -> String {
    let (status, json) = post(
        state,
        "/employees",
        json!({
            "name": name,
            "credential": format!("{}-pw", name.to_lowercase()),
            "role": role,
            "division": division,
            "title": "Staff",
            "hire_date": "2024-01-08",
            "base_salary": "1000000"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "onboard failed: {}", json);
    json["id"].as_str().unwrap().to_string()
}

async fn set_scores(state: &AppState, id: &str, kpi: &str, rating: &str) {
    let (status, json) = send(
        state,
        "PUT",
        &format!("/employees/{}", id),
        Some(json!({"kpi_score": kpi, "supervisor_rating": rating})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", json);
}

async fn remaining_leave(state: &AppState, id: &str) -> i64 {
    let (_, json) = get(state, &format!("/employees/{}", id)).await;
    json["remaining_leave_days"].as_i64().unwrap()
}

async fn submit_leave(state: &AppState, employee_id: &str) -> String {
    let (status, json) = post(
        state,
        "/leave",
        json!({
            "employee_id": employee_id,
            "leave_type": "annual",
            "start_date": "2025-05-05",
            "end_date": "2025-05-07",
            "reason": "family"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "submit failed: {}", json);
    assert_eq!(json["total_days"], 3);
    json["id"].as_str().unwrap().to_string()
}

fn scores(overall: &str) -> Value {
    json!({
        "punctuality": "80",
        "attendance": "80",
        "productivity": "80",
        "overall": overall
    })
}

// =============================================================================
// Registry
// =============================================================================

#[tokio::test]
async fn test_onboard_and_login() {
    let state = create_test_state();
    let id = onboard(&state, "Sari", "individual_contributor", "IT").await;
    assert_eq!(id, "EMP001");

    let (status, json) = post(
        &state,
        "/auth/login",
        json!({"id": "EMP001", "credential": "sari-pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Sari");
    assert_eq!(json["remaining_leave_days"], 12);
    assert!(json.get("credential").is_none());

    let (status, json) = post(
        &state,
        "/auth/login",
        json!({"id": "EMP001", "credential": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "AUTHENTICATION_FAILED");

    let (status, _) = post(
        &state,
        "/auth/login",
        json!({"id": "EMP999", "credential": "sari-pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_division_listing_and_supervisor() {
    let state = create_test_state();
    onboard(&state, "Sinta", "supervisor", "IT").await;
    onboard(&state, "Ani", "individual_contributor", "IT").await;
    onboard(&state, "Budi", "individual_contributor", "HR").await;

    let (status, json) = get(&state, "/divisions/IT/employees").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["EMP001", "SUP001"]);

    let (_, json) = get(&state, "/divisions/IT/supervisor").await;
    assert_eq!(json["supervisor_id"], "SUP001");

    // No supervisor in HR: falls back to the configured default.
    let (status, json) = get(&state, "/divisions/HR/supervisor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["supervisor_id"], "SUP001");
}

#[tokio::test]
async fn test_unknown_employee_is_404() {
    let state = create_test_state();
    let (status, json) = get(&state, "/employees/EMP404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, _) = get(&state, "/employees/EMP404/leave").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Performance
// =============================================================================

#[tokio::test]
async fn test_kpi_broadcast_sets_every_individual_contributor() {
    let state = create_test_state();
    let manager = onboard(&state, "Maya", "manager", "HQ").await;
    let staff = vec![
        onboard(&state, "Ani", "individual_contributor", "IT").await,
        onboard(&state, "Budi", "individual_contributor", "IT").await,
        onboard(&state, "Candra", "individual_contributor", "IT").await,
    ];

    let (status, json) = post(
        &state,
        "/kpi",
        json!({
            "division": "IT",
            "month": 3,
            "year": 2025,
            "score": "85",
            "manager_id": manager
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "kpi failed: {}", json);
    assert_eq!(json["updated_employees"].as_array().unwrap().len(), 3);

    for id in &staff {
        let (_, employee) = get(&state, &format!("/employees/{}", id)).await;
        assert_eq!(field(&employee, "kpi_score"), decimal("85"));
    }

    let (_, averages) = get(&state, "/kpi/averages").await;
    assert_eq!(field(&averages, "IT"), decimal("85"));
}

#[tokio::test]
async fn test_kpi_from_non_manager_is_rejected() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;

    let (status, json) = post(
        &state,
        "/kpi",
        json!({
            "division": "IT",
            "month": 3,
            "year": 2025,
            "score": "85",
            "manager_id": supervisor
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_layoff_risk_tracks_scores() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    set_scores(&state, &id, "85", "85").await;

    let (_, employee) = get(&state, &format!("/employees/{}", id)).await;
    assert_eq!(employee["layoff_risk"], false);

    let (status, _) = post(
        &state,
        "/evaluations",
        json!({
            "employee_id": id,
            "supervisor_id": supervisor,
            "scores": scores("55"),
            "comments": "needs support"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, employee) = get(&state, &format!("/employees/{}", id)).await;
    assert_eq!(field(&employee, "supervisor_rating"), decimal("55"));
    assert_eq!(employee["layoff_risk"], true);
}

#[tokio::test]
async fn test_monthly_evaluation_duplicate_is_409() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;

    let body = |overall: &str| {
        json!({
            "employee_id": id,
            "supervisor_id": supervisor,
            "month": 3,
            "year": 2025,
            "scores": scores(overall)
        })
    };

    let (status, _) = post(&state, "/evaluations/monthly", body("70")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post(&state, "/evaluations/monthly", body("95")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE");

    let (_, employee) = get(&state, &format!("/employees/{}", id)).await;
    assert_eq!(field(&employee, "supervisor_rating"), decimal("70"));
}

#[tokio::test]
async fn test_score_out_of_range_is_400() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;

    let (status, json) = post(
        &state,
        "/evaluations",
        json!({
            "employee_id": id,
            "supervisor_id": supervisor,
            "scores": scores("120")
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "overall");
}

// =============================================================================
// Leave
// =============================================================================

#[tokio::test]
async fn test_approval_deducts_balance() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let request = submit_leave(&state, &id).await;
    assert_eq!(remaining_leave(&state, &id).await, 12);

    let (status, json) = post(
        &state,
        &format!("/leave/{}/approve", request),
        json!({"approver_id": supervisor, "notes": "ok"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "approved");
    assert_eq!(json["approver_id"], supervisor);
    assert_eq!(remaining_leave(&state, &id).await, 9);
}

#[tokio::test]
async fn test_rejection_keeps_balance() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let request = submit_leave(&state, &id).await;

    let (status, json) = post(
        &state,
        &format!("/leave/{}/reject", request),
        json!({"approver_id": supervisor}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "rejected");
    assert_eq!(remaining_leave(&state, &id).await, 12);
}

#[tokio::test]
async fn test_second_decision_is_409_and_keeps_status() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let request = submit_leave(&state, &id).await;

    post(
        &state,
        &format!("/leave/{}/approve", request),
        json!({"approver_id": supervisor}),
    )
    .await;
    let (status, json) = post(
        &state,
        &format!("/leave/{}/reject", request),
        json!({"approver_id": supervisor}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");

    let (_, requests) = get(&state, &format!("/employees/{}/leave", id)).await;
    assert_eq!(requests[0]["status"], "approved");
    assert_eq!(remaining_leave(&state, &id).await, 9);
}

#[tokio::test]
async fn test_decision_on_bad_id() {
    let state = create_test_state();
    let supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;

    let (status, _) = post(
        &state,
        "/leave/not-a-uuid/approve",
        json!({"approver_id": supervisor}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/leave/2f1b7f0e-52a4-4a67-9a3c-0d6f1a2b3c4d/approve",
        json!({"approver_id": supervisor}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_approval_routing() {
    let state = create_test_state();
    let manager = onboard(&state, "Maya", "manager", "HQ").await;
    let it_supervisor = onboard(&state, "Sinta", "supervisor", "IT").await;
    let hr_supervisor = onboard(&state, "Hadi", "supervisor", "HR").await;
    let it_staff = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let hr_staff = onboard(&state, "Budi", "individual_contributor", "HR").await;

    submit_leave(&state, &it_staff).await;
    submit_leave(&state, &hr_staff).await;
    submit_leave(&state, &hr_supervisor).await;

    let requesters = |json: &Value| -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|r| r["employee_id"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, queue) = get(&state, &format!("/leave/approvals/{}", it_supervisor)).await;
    assert_eq!(requesters(&queue), vec![it_staff.clone()]);

    let (_, queue) = get(&state, &format!("/leave/approvals/{}", manager)).await;
    let mut seen = requesters(&queue);
    seen.sort();
    let mut expected = vec![it_staff.clone(), hr_staff, hr_supervisor];
    expected.sort();
    assert_eq!(seen, expected);

    let (status, queue) = get(&state, &format!("/leave/approvals/{}", it_staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(queue.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_end_before_start_is_400() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;

    let (status, json) = post(
        &state,
        "/leave",
        json!({
            "employee_id": id,
            "leave_type": "annual",
            "start_date": "2025-05-07",
            "end_date": "2025-05-05"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Compensation
// =============================================================================

#[tokio::test]
async fn test_salary_tiers() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    set_scores(&state, &id, "85", "75").await;

    let (status, salary) = get(&state, &format!("/employees/{}/salary", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&salary, "kpi_bonus"), decimal("150000"));
    assert_eq!(field(&salary, "supervisor_bonus"), decimal("50000"));
    assert_eq!(field(&salary, "penalty"), decimal("0"));
    assert_eq!(field(&salary, "total_salary"), decimal("1200000"));
    assert_eq!(salary["audit_steps"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_salary_penalty() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    set_scores(&state, &id, "50", "75").await;

    let (_, salary) = get(&state, &format!("/employees/{}/salary", id)).await;
    assert_eq!(field(&salary, "kpi_bonus"), decimal("0"));
    assert_eq!(field(&salary, "penalty"), decimal("100000"));
}

#[tokio::test]
async fn test_salary_snapshot_once_per_month() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    set_scores(&state, &id, "85", "75").await;
    let uri = format!("/employees/{}/salary/snapshots", id);

    let (status, json) = post(&state, &uri, json!({"month": 3, "year": 2025})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(field(&json, "total_salary"), decimal("1200000"));

    let (status, _) = post(&state, &uri, json!({"month": 3, "year": 2025})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(&state, &uri, json!({"month": 13, "year": 2025})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = get(&state, &format!("/employees/{}/salary/history", id)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_salary_overflow_is_400() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let (status, _) = send(
        &state,
        "PUT",
        &format!("/employees/{}", id),
        Some(json!({
            "base_salary": "70000000000000000000000000000",
            "kpi_score": "95",
            "supervisor_rating": "95"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(&state, &format!("/employees/{}/salary", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "base_salary");

    let uri = format!("/employees/{}/salary/snapshots", id);
    let (status, _) = post(&state, &uri, json!({"month": 3, "year": 2025})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn test_lateness_boundary() {
    let state = create_test_state();
    let a = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let b = onboard(&state, "Budi", "individual_contributor", "IT").await;

    let (status, json) = post(
        &state,
        "/attendance/clock-in",
        json!({"employee_id": a, "date": "2025-03-03", "time": "08:30"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["is_late"], false);

    let (_, json) = post(
        &state,
        "/attendance/clock-in",
        json!({"employee_id": b, "date": "2025-03-03", "time": "08:31"}),
    )
    .await;
    assert_eq!(json["is_late"], true);
}

#[tokio::test]
async fn test_clock_in_twice_and_clock_out() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;
    let clock_in = json!({"employee_id": id, "date": "2025-03-03", "time": "08:00"});

    post(&state, "/attendance/clock-in", clock_in.clone()).await;
    let (status, _) = post(&state, "/attendance/clock-in", clock_in).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let clock_out = json!({"employee_id": id, "date": "2025-03-03", "time": "17:00"});
    let (status, json) = post(&state, "/attendance/clock-out", clock_out.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["clock_out"], "17:00:00");

    let (status, _) = post(&state, "/attendance/clock-out", clock_out).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, history) = get(&state, &format!("/employees/{}/attendance", id)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_time_is_400() {
    let state = create_test_state();
    let id = onboard(&state, "Ani", "individual_contributor", "IT").await;

    let (status, json) = post(
        &state,
        "/attendance/clock-in",
        json!({"employee_id": id, "date": "2025-03-03", "time": "8.30am"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "clock_in");
}

// =============================================================================
// Request errors
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_400() {
    let state = create_test_state();
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/leave")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(json["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_is_400() {
    let state = create_test_state();
    let (status, json) = post(&state, "/auth/login", json!({"id": "EMP001"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
