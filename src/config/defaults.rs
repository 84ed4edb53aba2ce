//! System-wide default constants.
//!
//! The analysis thresholds below are the engine's documented behaviour; the
//! matching `AnalyticsConfig` fields default to them.

// ============================================================================
// Anomaly Detector
// ============================================================================

/// Fewer readings than this yields a single "insufficient data" result.
pub const ANOMALY_MIN_SAMPLES: usize = 10;

/// z-score above which a reading is a warning.
pub const ANOMALY_WARNING_Z: f64 = 2.0;

/// z-score above which a reading is critical.
pub const ANOMALY_CRITICAL_Z: f64 = 3.0;

/// Most recent readings fetched per anomaly pass.
pub const ANOMALY_FETCH_LIMIT: usize = 100;

// ============================================================================
// Trend Analyzer
// ============================================================================

/// Default look-back window (days).
pub const TREND_DEFAULT_DAYS: u32 = 7;

/// Absolute percent change above which a trend is a warning.
pub const TREND_WARNING_PERCENT: f64 = 15.0;

/// Absolute percent change above which a trend is critical.
pub const TREND_CRITICAL_PERCENT: f64 = 30.0;

// ============================================================================
// Quality Predictor
// ============================================================================

/// Most recent readings used for the regression.
pub const PREDICTION_HISTORY_LIMIT: usize = 50;

/// Minimum readings before a prediction is attempted.
pub const PREDICTION_MIN_SAMPLES: usize = 5;

/// Default extrapolation horizon (steps, nominally hours).
pub const PREDICTION_DEFAULT_HOURS_AHEAD: u32 = 24;

/// |slope| below this is reported as a stable trend.
pub const PREDICTION_STABLE_SLOPE: f64 = 0.01;

/// Confidence ceiling.
pub const PREDICTION_MAX_CONFIDENCE: f64 = 0.95;

/// Confidence floor.
pub const PREDICTION_MIN_CONFIDENCE: f64 = 0.5;

// ============================================================================
// Issue Pattern Analyzer
// ============================================================================

/// Hotspot grid cell size (degrees, both axes).
pub const GRID_SIZE_DEG: f64 = 0.01;

/// Minimum issues in a cell for it to count as a hotspot.
pub const MIN_HOTSPOT_COUNT: usize = 3;

/// Hotspots returned per analysis.
pub const MAX_HOTSPOTS: usize = 10;

/// Most recent issues considered per analysis.
pub const PATTERN_ISSUE_LIMIT: usize = 500;

// ============================================================================
// Alert Generator
// ============================================================================

/// Hotspots turned into alerts.
pub const HOTSPOT_ALERTS: usize = 3;

/// Top categories considered for alerts.
pub const CATEGORY_ALERTS: usize = 2;

/// Hotspot count above which the alert is critical.
pub const CRITICAL_HOTSPOT_COUNT: usize = 10;

/// Average ordinal priority above which a category raises an alert.
pub const ELEVATED_PRIORITY: f64 = 2.5;

/// Average ordinal priority above which the category alert is critical.
pub const CRITICAL_PRIORITY: f64 = 3.0;

// ============================================================================
// Server & Storage
// ============================================================================

/// Default HTTP bind address.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Default sled data directory.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Days covered by the dashboard daily issue histogram.
pub const DAILY_HISTOGRAM_DAYS: i64 = 7;

/// Issues fetched for dashboard statistics.
pub const STATS_ISSUE_LIMIT: usize = 5_000;
