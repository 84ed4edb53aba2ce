//! Analysis result types: Severity, AnalysisResult, QualityPrediction,
//! Hotspot, CategorySummary, IssuePatterns, Alert, IssueStats

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Priority;

// ============================================================================
// Severity & generic results
// ============================================================================

/// Severity tag attached to analysis results and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of a single analysis step. Ephemeral, never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub severity: Severity,
    pub message: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl AnalysisResult {
    /// Result without recommendations.
    pub fn new(severity: Severity, message: impl Into<String>, confidence: f64) -> Self {
        Self {
            severity,
            message: message.into(),
            confidence,
            recommendations: None,
        }
    }

    /// Plain `info` result.
    pub fn info(message: impl Into<String>, confidence: f64) -> Self {
        Self::new(Severity::Info, message, confidence)
    }

    /// Attach an ordered list of recommendations.
    pub fn with_recommendations(mut self, recommendations: &[&str]) -> Self {
        self.recommendations = Some(recommendations.iter().map(|r| (*r).to_string()).collect());
        self
    }
}

/// Suggested priority for an issue description. The caller persists it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityClassification {
    pub priority: Priority,
    pub confidence: f64,
}

// ============================================================================
// Prediction
// ============================================================================

/// Direction of a tracked layer value. Lower is better (pollution-like metrics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTrend {
    Improving,
    Stable,
    Declining,
}

/// Linear extrapolation of a layer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityPrediction {
    /// Extrapolated value, floored at 0
    pub predicted_value: f64,
    /// Confidence in [0.5, 0.95]
    pub confidence: f64,
    pub trend: QualityTrend,
}

// ============================================================================
// Issue patterns
// ============================================================================

/// Grid cell with enough issues to be considered a hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Cell origin latitude
    pub latitude: f64,
    /// Cell origin longitude
    pub longitude: f64,
    pub count: usize,
    /// Distinct categories seen in the cell, first-seen order
    pub categories: Vec<String>,
}

/// Per-category issue count and average ordinal priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    /// Mean of low=1 .. critical=4, in [1, 4]
    pub avg_priority: f64,
}

/// Output of the issue pattern analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePatterns {
    pub hotspots: Vec<Hotspot>,
    pub top_categories: Vec<CategorySummary>,
}

/// Human-readable alert derived from issue patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

// ============================================================================
// Dashboard statistics
// ============================================================================

/// Issue counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl PriorityBreakdown {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

/// Issue count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Issues created on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueStats {
    pub total: usize,
    /// Reported or in progress
    pub active: usize,
    pub resolved: usize,
    pub critical: usize,
    pub by_priority: PriorityBreakdown,
    pub by_category: Vec<CategoryCount>,
    /// Oldest day first
    pub daily: Vec<DailyCount>,
}

// ============================================================================
// Layer overview
// ============================================================================

/// Anomaly, trend and prediction results for one layer, computed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerOverview {
    pub layer_id: String,
    pub anomalies: Vec<AnalysisResult>,
    pub trend: AnalysisResult,
    /// `None` when the layer has too little history to extrapolate
    pub prediction: Option<QualityPrediction>,
}
