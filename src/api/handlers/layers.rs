//! Layer analysis and measurement ingest endpoints

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{analysis_error, DashboardState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::Measurement;

/// Longest look-back accepted by the trend endpoint.
const MAX_TREND_DAYS: u32 = 365;

/// Furthest extrapolation accepted by the prediction endpoint.
const MAX_HOURS_AHEAD: u32 = 24 * 30;

/// Largest ingest batch per request.
const MAX_INGEST_BATCH: usize = 10_000;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub hours_ahead: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub layer_id: String,
    pub inserted: usize,
}

/// GET /api/v1/layers/:layer_id/anomalies
pub async fn layer_anomalies(
    State(state): State<DashboardState>,
    Path(layer_id): Path<String>,
) -> Response {
    match state.analyzer.detect_anomalies(&layer_id).await {
        Ok(results) => ApiResponse::ok(results),
        Err(e) => analysis_error("anomalies", e),
    }
}

/// GET /api/v1/layers/:layer_id/trend?days=7
pub async fn layer_trend(
    State(state): State<DashboardState>,
    Path(layer_id): Path<String>,
    Query(q): Query<TrendQuery>,
) -> Response {
    if let Some(days) = q.days {
        if days == 0 || days > MAX_TREND_DAYS {
            return ApiErrorResponse::bad_request(format!(
                "days must be between 1 and {MAX_TREND_DAYS}"
            ));
        }
    }
    match state.analyzer.analyze_trend(&layer_id, q.days).await {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => analysis_error("trend", e),
    }
}

/// GET /api/v1/layers/:layer_id/prediction?hours_ahead=24
pub async fn layer_prediction(
    State(state): State<DashboardState>,
    Path(layer_id): Path<String>,
    Query(q): Query<PredictionQuery>,
) -> Response {
    if q.hours_ahead.is_some_and(|h| h > MAX_HOURS_AHEAD) {
        return ApiErrorResponse::bad_request(format!(
            "hours_ahead must be at most {MAX_HOURS_AHEAD}"
        ));
    }
    match state.analyzer.predict_quality(&layer_id, q.hours_ahead).await {
        Ok(prediction) => ApiResponse::ok(prediction),
        Err(e) => analysis_error("prediction", e),
    }
}

/// GET /api/v1/layers/:layer_id/overview
///
/// Anomalies, trend and prediction in one round trip.
pub async fn layer_overview(
    State(state): State<DashboardState>,
    Path(layer_id): Path<String>,
) -> Response {
    match state.analyzer.layer_overview(&layer_id).await {
        Ok(overview) => ApiResponse::ok(overview),
        Err(e) => analysis_error("overview", e),
    }
}

/// POST /api/v1/layers/:layer_id/measurements
///
/// Body is a JSON array of measurements. Validation rejects the whole batch
/// before anything is written. Inserts are not transactional: if the store
/// fails partway, earlier rows stay written and the 503 reports how many.
pub async fn ingest_measurements(
    State(state): State<DashboardState>,
    Path(layer_id): Path<String>,
    Json(batch): Json<Vec<Measurement>>,
) -> Response {
    if batch.len() > MAX_INGEST_BATCH {
        return ApiErrorResponse::bad_request(format!(
            "batch of {} exceeds the limit of {MAX_INGEST_BATCH}",
            batch.len()
        ));
    }
    if let Some(bad) = batch
        .iter()
        .position(|m| !(m.value.is_finite() && m.latitude.is_finite() && m.longitude.is_finite()))
    {
        return ApiErrorResponse::bad_request(format!("measurement {bad} has a non-finite field"));
    }

    for (written, m) in batch.iter().enumerate() {
        if let Err(e) = state.sink.insert_measurement(&layer_id, m).await {
            warn!(layer_id = %layer_id, written, error = %e, "Measurement ingest failed");
            return ApiErrorResponse::service_unavailable(format!(
                "Data access failure after {written} of {} measurements were written: {e}",
                batch.len()
            ));
        }
    }

    info!(layer_id = %layer_id, count = batch.len(), "Measurements ingested");
    ApiResponse::created(IngestResponse {
        layer_id,
        inserted: batch.len(),
    })
}
