//! HTTP handlers for the REST API.
//!
//! Each handler maps one route onto one Climate Query Service call. All
//! failures are converted to responses here, at the route boundary.

use axum::{
    extract::{Path, State},
    http::Uri,
    Json,
};

use super::error::AppError;
use super::state::AppState;
use crate::api::{DatedObservation, HealthResponse, PrecipitationSummary, TemperatureStats};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /
///
/// Plain-text listing of the available routes.
pub async fn welcome() -> &'static str {
    services::welcome()
}

/// GET /health
///
/// Reports whether the store answers queries. Always 200 so load balancers
/// can tell a running process from a dead one.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: db_status,
    }))
}

/// GET /api/v1.0/precipitation
///
/// Precipitation for the last year of data, keyed by date.
pub async fn precipitation(State(state): State<AppState>) -> HandlerResult<PrecipitationSummary> {
    let summary =
        services::precipitation_summary(state.repository.as_ref(), &state.dataset).await?;
    Ok(Json(summary))
}

/// GET /api/v1.0/stations
///
/// All station codes.
pub async fn stations(State(state): State<AppState>) -> HandlerResult<Vec<String>> {
    let stations = services::list_stations(state.repository.as_ref()).await?;
    Ok(Json(stations))
}

/// GET /api/v1.0/tobs
///
/// Last year of temperature observations from the most active station.
pub async fn tobs(State(state): State<AppState>) -> HandlerResult<Vec<DatedObservation>> {
    let observations =
        services::most_active_station_tobs(state.repository.as_ref(), &state.dataset).await?;
    Ok(Json(observations))
}

/// GET /api/v1.0/{start}
pub async fn temperature_stats_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> HandlerResult<TemperatureStats> {
    let stats = services::temperature_stats_from(state.repository.as_ref(), &start).await?;
    Ok(Json(stats))
}

/// GET /api/v1.0/{start}/{end}
pub async fn temperature_stats_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> HandlerResult<TemperatureStats> {
    let stats =
        services::temperature_stats_between(state.repository.as_ref(), &start, &end).await?;
    Ok(Json(stats))
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
