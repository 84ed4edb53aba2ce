//! Issue classification, intake and pattern endpoints

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::{analysis_error, DashboardState};
use crate::analysis;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::NewIssue;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub description: String,
    pub category: String,
}

/// POST /api/v1/issues/classify
///
/// Suggest a priority without storing anything.
pub async fn classify_issue(
    State(state): State<DashboardState>,
    Json(req): Json<ClassifyRequest>,
) -> Response {
    ApiResponse::ok(state.analyzer.classify_issue(&req.description, &req.category))
}

fn validate_report(report: &NewIssue) -> Result<(), String> {
    if report.category.trim().is_empty() {
        return Err("category must not be empty".to_string());
    }
    if !(report.latitude.is_finite() && (-90.0..=90.0).contains(&report.latitude)) {
        return Err(format!("latitude {} out of range", report.latitude));
    }
    if !(report.longitude.is_finite() && (-180.0..=180.0).contains(&report.longitude)) {
        return Err(format!("longitude {} out of range", report.longitude));
    }
    Ok(())
}

/// POST /api/v1/issues
///
/// Create an issue, classifying it when no priority is given.
pub async fn report_issue(
    State(state): State<DashboardState>,
    Json(report): Json<NewIssue>,
) -> Response {
    if let Err(msg) = validate_report(&report) {
        return ApiErrorResponse::bad_request(msg);
    }

    let issue = analysis::intake(report, Utc::now());
    if let Err(e) = state.sink.insert_issue(&issue).await {
        warn!(id = %issue.id, error = %e, "Issue insert failed");
        return ApiErrorResponse::service_unavailable(format!("Data access failure: {e}"));
    }

    info!(
        id = %issue.id,
        category = %issue.category,
        priority = %issue.priority,
        ai_classified = issue.ai_classified,
        "Issue reported"
    );
    ApiResponse::created(issue)
}

/// GET /api/v1/issues/patterns
pub async fn issue_patterns(State(state): State<DashboardState>) -> Response {
    match state.analyzer.analyze_issue_patterns().await {
        Ok(patterns) => ApiResponse::ok(patterns),
        Err(e) => analysis_error("patterns", e),
    }
}

/// GET /api/v1/issues/stats
pub async fn issue_stats(State(state): State<DashboardState>) -> Response {
    match state.analyzer.issue_stats(Utc::now().date_naive()).await {
        Ok(stats) => ApiResponse::ok(stats),
        Err(e) => analysis_error("stats", e),
    }
}

/// GET /api/v1/alerts
pub async fn alerts(State(state): State<DashboardState>) -> Response {
    match state.analyzer.generate_alerts().await {
        Ok(alerts) => ApiResponse::ok(alerts),
        Err(e) => analysis_error("alerts", e),
    }
}
