//! Z-score anomaly detection over a layer's readings.
//!
//! Each reading is scored against the population mean and standard deviation
//! of the whole batch:
//! - `z > critical_z` (3σ) → critical, confidence grows with z, capped at 0.95
//! - `warning_z < z <= critical_z` → warning
//! - otherwise normal, nothing emitted
//!
//! A batch with zero spread cannot contain an outlier and is reported as
//! normal without computing any z-score.

use tracing::debug;

use super::stats;
use crate::config::AnomalyConfig;
use crate::types::{values_of, AnalysisResult, Measurement, Severity};

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Insufficient data for anomaly detection";
pub const ALL_NORMAL_MESSAGE: &str = "All readings within normal range";

const CRITICAL_RECOMMENDATIONS: [&str; 3] = [
    "Immediate investigation required",
    "Deploy additional sensors in the area",
    "Alert local authorities",
];

const WARNING_RECOMMENDATIONS: [&str; 2] = ["Monitor the area closely", "Verify sensor calibration"];

/// |value - mean| / std. Callers guarantee `std > 0`.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    (value - mean).abs() / std_dev
}

/// Classify a z-score. `None` means the reading is normal.
pub fn classify_z(z: f64, config: &AnomalyConfig) -> Option<Severity> {
    if z > config.critical_z {
        Some(Severity::Critical)
    } else if z > config.warning_z {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Scan a batch of readings for statistical outliers.
///
/// Never returns an empty vector: a short batch or a clean batch yields a
/// single `info` result instead.
pub fn detect_anomalies(measurements: &[Measurement], config: &AnomalyConfig) -> Vec<AnalysisResult> {
    if measurements.len() < config.min_samples {
        debug!(
            count = measurements.len(),
            required = config.min_samples,
            "Anomaly detection skipped: insufficient data"
        );
        return vec![AnalysisResult::info(INSUFFICIENT_DATA_MESSAGE, 0.5)];
    }

    let values = values_of(measurements);
    let (Some(mean), Some(std_dev)) = (stats::mean(&values), stats::population_std_dev(&values))
    else {
        return vec![AnalysisResult::info(INSUFFICIENT_DATA_MESSAGE, 0.5)];
    };

    if std_dev <= 0.0 || !std_dev.is_finite() {
        debug!(mean, "Zero-variance batch, no anomaly possible");
        return vec![AnalysisResult::info(ALL_NORMAL_MESSAGE, 0.8)];
    }

    let anomalies: Vec<AnalysisResult> = measurements
        .iter()
        .filter_map(|point| {
            let z = z_score(point.value, mean, std_dev);
            classify_z(z, config).map(|severity| describe(point, z, severity, config))
        })
        .collect();

    debug!(
        count = measurements.len(),
        mean,
        std_dev,
        anomalies = anomalies.len(),
        "Anomaly detection complete"
    );

    if anomalies.is_empty() {
        vec![AnalysisResult::info(ALL_NORMAL_MESSAGE, 0.8)]
    } else {
        anomalies
    }
}

fn describe(point: &Measurement, z: f64, severity: Severity, config: &AnomalyConfig) -> AnalysisResult {
    match severity {
        Severity::Critical => AnalysisResult::new(
            Severity::Critical,
            format!(
                "Critical anomaly detected at ({:.4}, {:.4}): value {:.2} ({:.2}σ from mean)",
                point.latitude, point.longitude, point.value, z
            ),
            (0.7 + (z - config.critical_z) * 0.05).min(0.95),
        )
        .with_recommendations(&CRITICAL_RECOMMENDATIONS),
        _ => AnalysisResult::new(
            Severity::Warning,
            format!(
                "Unusual reading at ({:.4}, {:.4}): value {:.2} ({:.2}σ from mean)",
                point.latitude, point.longitude, point.value, z
            ),
            0.65 + (z - config.warning_z) * 0.1,
        )
        .with_recommendations(&WARNING_RECOMMENDATIONS),
    }
}
