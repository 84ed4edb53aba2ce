//! Health, layer catalog and configuration endpoints

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::LAYER_CATALOG;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub city: String,
    pub region: String,
    pub backend: &'static str,
    pub uptime_secs: u64,
}

/// GET /api/v1/health
pub async fn health(State(state): State<DashboardState>) -> Response {
    let city = &state.analyzer.config().city;
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        city: city.name.clone(),
        region: city.region.clone(),
        backend: state.analyzer.backend_name(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/v1/layers
pub async fn list_layers() -> Response {
    ApiResponse::ok(&LAYER_CATALOG[..])
}

/// GET /api/v1/config - thresholds the analyzer is running with
pub async fn get_config(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.analyzer.config().clone())
}

/// Fallback for unknown API paths.
pub async fn unknown_route(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}
