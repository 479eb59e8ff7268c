//! HTTP request handlers for the Budget Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_amortization;
use crate::engine::compute_budget;
use crate::error::EngineError;
use crate::models::{BudgetSnapshot, InvestmentLine};

use super::request::AmortizationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/budget", post(budget_handler))
        .route("/amortization", post(amortization_handler))
        .with_state(state)
}

/// Handler for POST /budget endpoint.
///
/// Accepts a budget snapshot and returns the full budget report.
async fn budget_handler(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing budget request");

    let document = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => return bad_request(rejection_error(correlation_id, rejection)),
    };

    let snapshot = match BudgetSnapshot::from_value(document) {
        Ok(snapshot) => snapshot,
        Err(err) => return engine_error(correlation_id, err),
    };

    let start_time = Instant::now();
    match compute_budget(&snapshot, state.config().config()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                services_count = report.services.len(),
                total_charges = %report.summary.total_charges,
                global_balance = %report.summary.global_balance,
                warnings = report.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Budget computed successfully"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /amortization endpoint.
///
/// Accepts one investment and returns its depreciation and loan schedule.
async fn amortization_handler(
    payload: Result<Json<AmortizationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing amortization request");

    let line: InvestmentLine = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return bad_request(rejection_error(correlation_id, rejection)),
    };

    if let Err(err) = line.check_ranges("investment") {
        return engine_error(correlation_id, err);
    }

    let result = calculate_amortization(&line);
    info!(
        correlation_id = %correlation_id,
        principal = %result.principal,
        duration_years = result.duration_years,
        total_cost = %result.total_cost,
        "Amortization computed successfully"
    );
    json_response(StatusCode::OK, result)
}

/// Maps a body extraction failure to an API error.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
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
    }
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn bad_request(error: ApiError) -> Response {
    json_response(StatusCode::BAD_REQUEST, error)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
