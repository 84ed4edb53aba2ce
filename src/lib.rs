//! Urban Pulse: civic issue and city-layer analytics
//!
//! Statistical and pattern-detection engine behind a civic issue-tracking
//! dashboard.
//!
//! ## Architecture
//!
//! - **Store**: read contract over layer measurements and issue records
//!   (`DataStore`), with in-memory and sled backends
//! - **Analysis**: priority classifier, z-score anomaly detector, trend
//!   analyzer, linear quality predictor, grid hotspot analyzer, alerts
//! - **API**: axum router exposing the analyses as JSON

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

// Re-export configuration
pub use config::AnalyticsConfig;

// Re-export the analyzer facade and errors
pub use analysis::UrbanAnalyzer;
pub use error::{AnalysisError, AnalysisOutcome};

// Re-export storage
pub use store::{DataSink, DataStore, InMemoryStore, SledStore, Store, StoreError};

// Re-export commonly used types
pub use types::{
    Alert, AnalysisResult, CategorySummary, Dataset, Hotspot, Issue, IssuePatterns, IssueStats,
    LayerMeasurement, Measurement, NewIssue, Priority, PriorityClassification,
    QualityPrediction, QualityTrend, Severity,
};
