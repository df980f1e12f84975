//! HTTP request handlers for the payroll engine API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{ViewerRole, apply_visibility, forecast_week, run_payroll};
use crate::error::EngineError;
use crate::models::PayPeriod;

use super::request::{ForecastRequest, PayrollRequest};
use super::response::{ApiError, ApiErrorResponse, PayrollResponse};
use super::state::AppState;

/// Header carrying the caller's role.
pub const VIEWER_ROLE_HEADER: &str = "x-viewer-role";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(payroll_handler))
        .route("/forecast", post(forecast_handler))
        .with_state(state)
}

/// Handler for POST /payroll.
///
/// Returns the month's payroll report, filtered for the caller's role.
async fn payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let viewer = match viewer_role(&headers, correlation_id) {
        Ok(viewer) => viewer,
        Err(response) => return response.into_response(),
    };
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    let period = match PayPeriod::from_month(&request.month) {
        Ok(period) => period,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected payroll period");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let config = state.effective_config(request.config.as_ref());
    let start_time = Instant::now();
    let report = run_payroll(&request.snapshot, &period, request.hours_source, config);
    let report = apply_visibility(report, viewer);

    info!(
        correlation_id = %correlation_id,
        month = %request.month,
        viewer = ?viewer,
        staff_lines = report.staff.len(),
        total_cost = %report.totals.cost.total_cost,
        warnings = report.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll completed successfully"
    );

    json_ok(PayrollResponse::new(report))
}

/// Handler for POST /forecast.
///
/// Returns contracted versus scheduled figures for the week containing
/// `week_start`.
async fn forecast_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing forecast request");

    if let Err(response) = viewer_role(&headers, correlation_id) {
        return response.into_response();
    }
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    let week = match PayPeriod::week_containing(request.week_start) {
        Ok(week) => week,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected forecast week");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let config = state.effective_config(request.config.as_ref());
    let start_time = Instant::now();
    let result = forecast_week(
        &request.snapshot,
        &week,
        request.location_id.as_deref(),
        config,
    );

    info!(
        correlation_id = %correlation_id,
        week_start = %week.start_date,
        hours_variance = %result.variance.hours,
        cost_variance = %result.variance.cost,
        duration_us = start_time.elapsed().as_micros(),
        "Forecast completed successfully"
    );

    json_ok(result)
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Reads the caller's role; a missing or unknown role is rejected.
fn viewer_role(headers: &HeaderMap, correlation_id: Uuid) -> Result<ViewerRole, ApiErrorResponse> {
    let role = headers
        .get(VIEWER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    role.parse::<ViewerRole>().map_err(|err: EngineError| {
        warn!(correlation_id = %correlation_id, role = %role, "Access denied");
        err.into()
    })
}

fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::ForecastResult;
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::new(config)
    }

    fn payroll_body() -> Value {
        json!({
            "month": "2026-01",
            "hours_source": "shifts",
            "staff": [
                {"id": "staff_001", "name": "Sam", "payment_type": "hourly"},
                {
                    "id": "staff_002",
                    "name": "Morgan",
                    "role": "manager",
                    "payment_type": "monthly",
                    "monthly_salary": "2000"
                }
            ],
            "categories": [
                {"id": "cat_bar", "name": "Bar", "default_hourly_rate": "15.00"}
            ],
            "shifts": [
                {
                    "id": "shift_001",
                    "user_id": "staff_001",
                    "start": "2026-01-15T09:00:00",
                    "end": "2026-01-15T17:00:00",
                    "category_id": "cat_bar"
                }
            ]
        })
    }

    async fn post(uri: &str, role: Option<&str>, body: String) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(role) = role {
            builder = builder.header(VIEWER_ROLE_HEADER, role);
        }
        create_router(create_test_state())
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_payroll_admin_returns_200() {
        let response = post("/payroll", Some("admin"), payroll_body().to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");

        let body = body_json(response).await;
        let result: PayrollResponse = serde_json::from_value(body).unwrap();
        assert_eq!(result.report.staff.len(), 2);
        // 8h shift reaches the 8h/45m rule => 7.25h at $15.
        assert_eq!(result.report.staff[0].cost.gross_pay, Decimal::new(10875, 2));
    }

    #[tokio::test]
    async fn test_payroll_manager_hides_privileged_rows() {
        let admin = body_json(post("/payroll", Some("admin"), payroll_body().to_string()).await).await;
        let manager = body_json(post("/payroll", Some("manager"), payroll_body().to_string()).await).await;

        assert_eq!(manager["staff"].as_array().unwrap().len(), 1);
        assert_eq!(manager["totals"], admin["totals"]);
    }

    #[tokio::test]
    async fn test_payroll_without_role_returns_403() {
        let response = post("/payroll", None, payroll_body().to_string()).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "ACCESS_DENIED");
    }

    #[tokio::test]
    async fn test_payroll_invalid_month_returns_400() {
        let mut body = payroll_body();
        body["month"] = json!("2026-13");

        let response = post("/payroll", Some("admin"), body.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = post("/payroll", Some("admin"), "{invalid json".to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_forecast_returns_200() {
        let body = json!({
            "week_start": "2026-01-14",
            "staff": [
                {
                    "id": "staff_001",
                    "name": "Sam",
                    "payment_type": "hourly",
                    "contracted_hours": "8",
                    "primary_category_id": "cat_bar"
                }
            ],
            "categories": [
                {"id": "cat_bar", "name": "Bar", "default_hourly_rate": "15.00"}
            ],
            "shifts": [
                {
                    "id": "shift_001",
                    "user_id": "staff_001",
                    "start": "2026-01-15T09:00:00",
                    "end": "2026-01-15T13:00:00",
                    "category_id": "cat_bar"
                }
            ]
        });

        let response = post("/forecast", Some("manager"), body.to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let result: ForecastResult = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(result.week.start_date.to_string(), "2026-01-12");
        assert_eq!(result.variance.hours, Decimal::new(-4, 0));
        assert_eq!(result.variance.hours_percent, Decimal::new(-50, 0));
    }
}
