//! API route definitions
//!
//! - /api/v1/health, /layers, /config - service info
//! - /api/v1/layers/:layer_id/* - per-layer analyses and ingest
//! - /api/v1/issues/* and /alerts - issue intake and pattern analyses

use axum::{routing::{get, post}, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Layers
        .route("/layers", get(handlers::list_layers))
        .route("/layers/:layer_id/anomalies", get(handlers::layer_anomalies))
        .route("/layers/:layer_id/trend", get(handlers::layer_trend))
        .route("/layers/:layer_id/prediction", get(handlers::layer_prediction))
        .route("/layers/:layer_id/overview", get(handlers::layer_overview))
        .route("/layers/:layer_id/measurements", post(handlers::ingest_measurements))
        // Issues (fixed paths only, no parameterized siblings)
        .route("/issues", post(handlers::report_issue))
        .route("/issues/classify", post(handlers::classify_issue))
        .route("/issues/patterns", get(handlers::issue_patterns))
        .route("/issues/stats", get(handlers::issue_stats))
        .route("/alerts", get(handlers::alerts))
        .fallback(handlers::unknown_route)
        .with_state(state)
}
