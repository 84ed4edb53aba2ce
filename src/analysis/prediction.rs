//! Linear-trend quality prediction.
//!
//! Fits an OLS line over the chronological readings (index `0..n-1`) and
//! extrapolates `hours_ahead` steps past the last observed index. Tracked
//! layers are non-negative (concentrations, indices) and lower is better:
//! predictions are floored at zero and a falling slope reads as improving.

use tracing::debug;

use super::stats::{self, LinearFit};
use crate::config::PredictionConfig;
use crate::error::AnalysisError;
use crate::types::{QualityPrediction, QualityTrend};

/// Trend label for a fitted slope.
pub fn trend_for_slope(slope: f64, config: &PredictionConfig) -> QualityTrend {
    if slope.abs() < config.stable_slope {
        QualityTrend::Stable
    } else if slope < 0.0 {
        QualityTrend::Improving
    } else {
        QualityTrend::Declining
    }
}

/// Confidence from fit quality: `1 - rmse / range`, bounded to
/// `[min_confidence, max_confidence]`. A flat series fits perfectly.
pub fn fit_confidence(fit: &LinearFit, values: &[f64], config: &PredictionConfig) -> f64 {
    let range = stats::value_range(values).unwrap_or(0.0);
    if range <= 0.0 {
        return config.max_confidence;
    }
    let raw = 1.0 - fit.rmse(values) / range;
    raw.max(config.min_confidence).min(config.max_confidence)
}

/// Predict the value `hours_ahead` steps after the last reading.
///
/// `values` must be ordered oldest first.
pub fn predict(
    values: &[f64],
    hours_ahead: u32,
    config: &PredictionConfig,
) -> Result<QualityPrediction, AnalysisError> {
    let insufficient = || AnalysisError::InsufficientData {
        operation: "prediction",
        required: config.min_samples.max(2),
        available: values.len(),
    };

    if values.len() < config.min_samples {
        return Err(insufficient());
    }
    let fit = stats::linear_fit(values).ok_or_else(insufficient)?;

    let target_index = (values.len() - 1) as f64 + f64::from(hours_ahead);
    let predicted_value = fit.at(target_index).max(0.0);
    let confidence = fit_confidence(&fit, values, config);
    let trend = trend_for_slope(fit.slope, config);

    debug!(
        samples = values.len(),
        slope = fit.slope,
        intercept = fit.intercept,
        predicted_value,
        confidence,
        ?trend,
        "Prediction computed"
    );

    Ok(QualityPrediction {
        predicted_value,
        confidence,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PredictionConfig {
        PredictionConfig::default()
    }

    #[test]
    fn test_linear_series_one_step_ahead() {
        let p = predict(&[10.0, 12.0, 14.0, 16.0, 18.0], 1, &cfg()).unwrap();
        assert!((p.predicted_value - 20.0).abs() < 1e-9);
        assert!((p.confidence - 0.95).abs() < 1e-9);
        assert_eq!(p.trend, QualityTrend::Declining);
    }

    #[test]
    fn test_falling_series_improves_and_floors_at_zero() {
        let p = predict(&[50.0, 40.0, 30.0, 20.0, 10.0], 24, &cfg()).unwrap();
        assert_eq!(p.trend, QualityTrend::Improving);
        assert_eq!(p.predicted_value, 0.0);
    }

    #[test]
    fn test_constant_series_is_stable_with_max_confidence() {
        let p = predict(&[7.0; 8], 24, &cfg()).unwrap();
        assert_eq!(p.trend, QualityTrend::Stable);
        assert!((p.predicted_value - 7.0).abs() < 1e-9);
        assert!((p.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_slope_is_stable() {
        let values: Vec<f64> = (0..10).map(|i| 5.0 + f64::from(i) * 0.001).collect();
        assert_eq!(predict(&values, 1, &cfg()).unwrap().trend, QualityTrend::Stable);
    }

    #[test]
    fn test_noisy_series_confidence_floor() {
        // Alternating values fit a line poorly: raw confidence drops below the floor
        let values = [0.0, 10.0, 0.0, 10.0, 0.0, 10.0];
        let p = predict(&values, 1, &cfg()).unwrap();
        assert!(p.confidence >= 0.5 && p.confidence <= 0.95);
    }

    #[test]
    fn test_too_few_points_errors() {
        let err = predict(&[1.0, 2.0, 3.0, 4.0], 24, &cfg()).unwrap_err();
        match err {
            AnalysisError::InsufficientData { required, available, .. } => {
                assert_eq!(required, 5);
                assert_eq!(available, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_horizon_predicts_last_fitted_point() {
        let p = predict(&[10.0, 12.0, 14.0, 16.0, 18.0], 0, &cfg()).unwrap();
        assert!((p.predicted_value - 18.0).abs() < 1e-9);
    }
}
