use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::PanelConfig;
use crate::error::{EstimateError, WeatherError};
use crate::models::api::{
    ComparisonRequest, ComparisonResponse, ComparisonTable, ErrorBody, EstimateQuery,
    LocationFailure,
};
use crate::models::estimate::LocationResult;
use crate::shared_state::AppState;

pub fn status_for(err: &EstimateError) -> StatusCode {
    match err {
        EstimateError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
        EstimateError::UpstreamData {
            source: WeatherError::NotFound(_),
            ..
        } => StatusCode::NOT_FOUND,
        EstimateError::UpstreamData { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// GET /api/estimate
/// Estimate the PV yield of one location
///
/// Fetches one weather snapshot for the location and estimates the hourly
/// energy yield for every day of the range. The result is not added to the
/// comparison session.
#[utoipa::path(
    get,
    path = "/api/estimate",
    params(EstimateQuery),
    responses(
        (status = 200, description = "Estimated yield", body = LocationResult),
        (status = 400, description = "End date precedes start date", body = ErrorBody),
        (status = 404, description = "Location not found", body = ErrorBody),
        (status = 502, description = "Weather provider failure", body = ErrorBody)
    )
)]
pub async fn get_estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> Response {
    let end_date = query.end_date.unwrap_or(query.start_date);
    match state
        .estimator
        .estimate_location(&query.location, query.start_date, end_date)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

/// POST /api/comparison
/// Add locations to the comparison session
///
/// Every location is estimated independently; failures are reported per
/// location and do not prevent the others from being added.
#[utoipa::path(
    post,
    path = "/api/comparison",
    request_body = ComparisonRequest,
    responses(
        (status = 200, description = "Per-location results and the session table", body = ComparisonResponse),
        (status = 400, description = "End date precedes start date", body = ErrorBody)
    )
)]
pub async fn post_comparison(
    State(state): State<AppState>,
    Json(req): Json<ComparisonRequest>,
) -> Response {
    let end_date = req.end_date.unwrap_or(req.start_date);
    if end_date < req.start_date {
        let err = EstimateError::InvalidRange {
            start: req.start_date,
            end: end_date,
        };
        return error_response(status_for(&err), err.to_string());
    }

    let outcomes = state
        .estimator
        .compare_locations(&req.locations, req.start_date, end_date)
        .await;

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for (location, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => failures.push(LocationFailure {
                location,
                error: e.to_string(),
            }),
        }
    }

    let session = state.record(results.clone());
    let response = ComparisonResponse {
        results,
        failures,
        table: session.rows(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/comparison
/// Current comparison table
#[utoipa::path(
    get,
    path = "/api/comparison",
    responses(
        (status = 200, description = "Rows in insertion order and the best location", body = ComparisonTable)
    )
)]
pub async fn get_comparison(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.snapshot();
    Json(ComparisonTable {
        rows: session.rows(),
        best: session.best(),
    })
}

/// DELETE /api/comparison
/// Start a new comparison session
#[utoipa::path(
    delete,
    path = "/api/comparison",
    responses(
        (status = 204, description = "Session cleared")
    )
)]
pub async fn clear_comparison(State(state): State<AppState>) -> impl IntoResponse {
    state.reset();
    StatusCode::NO_CONTENT
}

/// GET /api/panel
/// Panel parameters used by the irradiance model
#[utoipa::path(
    get,
    path = "/api/panel",
    responses(
        (status = 200, description = "Panel configuration", body = PanelConfig)
    )
)]
pub async fn get_panel(State(panel): State<PanelConfig>) -> impl IntoResponse {
    Json(panel)
}
