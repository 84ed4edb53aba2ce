//! Urban Analytics Engine
//!
//! Statistical and pattern-detection routines over layer measurements and
//! civic issue records:
//!
//! ```text
//! DataStore ──► anomaly    (z-score outliers, last N readings)
//!           ├─► trend      (early vs late window, last D days)
//!           ├─► prediction (OLS extrapolation, last 50 readings)
//!           └─► patterns   (grid hotspots + category averages) ──► alerts
//!
//! classifier ◄── intake (issue creation, independent of the pipeline)
//! ```
//!
//! Every component is a pure function over already-fetched data. The
//! `UrbanAnalyzer` facade performs the single fetch per entry point against
//! an injected `DataStore` and hands the result to the pure function. No
//! state is kept between calls, so concurrent calls never interfere.

pub mod alerts;
pub mod anomaly;
pub mod classifier;
pub mod intake;
pub mod patterns;
pub mod prediction;
pub mod stats;
pub mod summary;
pub mod trend;

pub use alerts::generate_alerts;
pub use anomaly::detect_anomalies;
pub use classifier::classify;
pub use intake::intake;
pub use patterns::analyze_patterns;
pub use prediction::predict;
pub use summary::summarize_issues;
pub use trend::analyze_trend;

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::config::{self, defaults::STATS_ISSUE_LIMIT, AnalyticsConfig};
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::store::DataStore;
use crate::types::{
    values_of, Alert, AnalysisResult, IssuePatterns, IssueStats, LayerOverview,
    PriorityClassification, QualityPrediction,
};

/// Analysis entry points bound to a data store and a set of thresholds.
///
/// Cheap to clone; clones share the same store handle.
#[derive(Clone)]
pub struct UrbanAnalyzer {
    store: Arc<dyn DataStore>,
    config: AnalyticsConfig,
}

impl UrbanAnalyzer {
    pub fn new(store: Arc<dyn DataStore>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    /// Analyzer using the process-wide config (defaults before `config::init`).
    pub fn with_global_config(store: Arc<dyn DataStore>) -> Self {
        Self::new(store, config::get())
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Suggested priority for a new issue. Pure; no store access.
    pub fn classify_issue(&self, description: &str, category: &str) -> PriorityClassification {
        classifier::classify(description, category)
    }

    /// Outliers among the most recent readings of a layer.
    pub async fn detect_anomalies(&self, layer_id: &str) -> AnalysisOutcome<Vec<AnalysisResult>> {
        let cfg = &self.config.anomaly;
        let readings = self
            .store
            .fetch_measurements(layer_id, cfg.fetch_limit, true)
            .await?;
        debug!(layer_id, count = readings.len(), "Fetched readings for anomaly detection");
        Ok(anomaly::detect_anomalies(&readings, cfg))
    }

    /// Direction and size of change over the last `days` days
    /// (`trend.default_days` when `None`).
    pub async fn analyze_trend(&self, layer_id: &str, days: Option<u32>) -> AnalysisOutcome<AnalysisResult> {
        let cfg = &self.config.trend;
        let days = days.unwrap_or(cfg.default_days);
        let since = Utc::now() - Duration::days(i64::from(days));
        let readings = self.store.fetch_measurements_since(layer_id, since).await?;
        debug!(layer_id, days, count = readings.len(), "Fetched readings for trend analysis");
        Ok(trend::analyze_trend(&values_of(&readings), days, cfg))
    }

    /// Extrapolate a layer `hours_ahead` readings past its latest one
    /// (`prediction.default_hours_ahead` when `None`).
    ///
    /// Fails with `InsufficientData` when the layer has too little history.
    pub async fn predict_quality(
        &self,
        layer_id: &str,
        hours_ahead: Option<u32>,
    ) -> AnalysisOutcome<QualityPrediction> {
        let cfg = &self.config.prediction;
        let hours_ahead = hours_ahead.unwrap_or(cfg.default_hours_ahead);
        let mut readings = self
            .store
            .fetch_measurements(layer_id, cfg.history_limit, true)
            .await?;
        readings.reverse();
        debug!(layer_id, hours_ahead, count = readings.len(), "Fetched readings for prediction");
        prediction::predict(&values_of(&readings), hours_ahead, cfg)
    }

    /// Hotspots and category summaries over the most recent issues.
    pub async fn analyze_issue_patterns(&self) -> AnalysisOutcome<IssuePatterns> {
        let cfg = &self.config.patterns;
        let issues = self.store.fetch_issues(None, cfg.issue_limit).await?;
        Ok(patterns::analyze_patterns(&issues, cfg))
    }

    /// Alerts derived from the current issue patterns.
    pub async fn generate_alerts(&self) -> AnalysisOutcome<Vec<Alert>> {
        let patterns = self.analyze_issue_patterns().await?;
        Ok(alerts::generate_alerts(&patterns, &self.config.alerts))
    }

    /// Dashboard headline numbers, with the daily histogram ending `today`.
    pub async fn issue_stats(&self, today: NaiveDate) -> AnalysisOutcome<IssueStats> {
        let issues = self.store.fetch_issues(None, STATS_ISSUE_LIMIT).await?;
        Ok(summary::summarize_issues(&issues, today))
    }

    /// Anomalies, trend and prediction for one layer, fetched concurrently.
    ///
    /// A layer too short to predict yields `prediction: None`; a data-access
    /// failure in any of the three fails the whole overview.
    pub async fn layer_overview(&self, layer_id: &str) -> AnalysisOutcome<LayerOverview> {
        let (anomalies, trend, prediction) = tokio::join!(
            self.detect_anomalies(layer_id),
            self.analyze_trend(layer_id, None),
            self.predict_quality(layer_id, None),
        );

        let prediction = match prediction {
            Ok(p) => Some(p),
            Err(AnalysisError::InsufficientData { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(LayerOverview {
            layer_id: layer_id.to_string(),
            anomalies: anomalies?,
            trend: trend?,
            prediction,
        })
    }
}

impl std::fmt::Debug for UrbanAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrbanAnalyzer")
            .field("backend", &self.store.backend_name())
            .field("city", &self.config.city.name)
            .finish()
    }
}
