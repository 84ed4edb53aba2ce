//! API route handlers
//!
//! Request handling for all endpoints:
//! - Layer analyses (anomalies, trend, prediction, overview) and ingest
//! - Issue classification, intake, patterns, statistics and alerts
//! - Health, layer catalog and active configuration

mod issues;
mod layers;
mod system;

pub use issues::*;
pub use layers::*;
pub use system::*;

use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::envelope::ApiErrorResponse;
use crate::analysis::UrbanAnalyzer;
use crate::config::AnalyticsConfig;
use crate::error::AnalysisError;
use crate::store::{DataSink, Store};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Read side: every analysis goes through the analyzer
    pub analyzer: UrbanAnalyzer,
    /// Write side for measurement ingest and issue intake
    pub sink: Arc<dyn DataSink>,
    /// Server start, for uptime reporting
    pub started_at: Instant,
}

impl DashboardState {
    /// Create state over a store that serves both reads and writes.
    pub fn new<S: Store + 'static>(store: Arc<S>, config: AnalyticsConfig) -> Self {
        Self {
            analyzer: UrbanAnalyzer::new(store.clone(), config),
            sink: store,
            started_at: Instant::now(),
        }
    }
}

/// Map an analysis failure onto the response envelope.
///
/// Upstream data-access failures are 503; a request that cannot be answered
/// from the available data is 400.
pub(crate) fn analysis_error(context: &str, err: AnalysisError) -> Response {
    match err {
        AnalysisError::DataAccess(e) => {
            warn!(context, error = %e, "Store access failed");
            ApiErrorResponse::service_unavailable(format!("Data access failure: {e}"))
        }
        e @ AnalysisError::InsufficientData { .. } => ApiErrorResponse::bad_request(e.to_string()),
    }
}
