//! Early-vs-late window trend analysis.
//!
//! The window is split chronologically in two (the extra reading of an odd
//! count goes to the later half) and the change of the later mean relative to
//! the earlier one decides the severity.
//!
//! A zero baseline has no percent change. If both halves average zero the
//! trend is stable; otherwise the change is unbounded and reported critical
//! without a percentage. The same applies when a near-zero baseline makes the
//! ratio overflow. When the halves differ in sign the change is taken
//! relative to `|baseline|`, so the reported direction is the direction the
//! values actually moved.

use tracing::debug;

use super::stats;
use crate::config::TrendConfig;
use crate::types::{AnalysisResult, Severity};

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Insufficient data for trend analysis";

const CRITICAL_RECOMMENDATIONS: [&str; 3] = [
    "Investigate root causes",
    "Implement corrective measures",
    "Increase monitoring frequency",
];

const WARNING_RECOMMENDATIONS: [&str; 2] = ["Continue monitoring", "Prepare contingency plans"];

/// Relative change between the two halves of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// Finite percent change
    Percent(f64),
    /// Zero (or vanishing) baseline; carries the direction of movement
    Unbounded { increase: bool },
}

/// Percent change of `later` relative to `baseline`.
pub fn percent_change(baseline: f64, later: f64) -> Change {
    if baseline == 0.0 {
        if later == 0.0 {
            Change::Percent(0.0)
        } else {
            Change::Unbounded { increase: later > 0.0 }
        }
    } else {
        // Across a sign change the plain ratio has the wrong sign
        let divisor = if baseline.signum() == later.signum() { baseline } else { baseline.abs() };
        let pct = (later - baseline) / divisor * 100.0;
        if pct.is_finite() {
            Change::Percent(pct)
        } else {
            Change::Unbounded { increase: later > baseline }
        }
    }
}

/// Means of the chronological halves; `None` for fewer than two values.
pub fn half_means(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let (first, second) = values.split_at(values.len() / 2);
    Some((stats::mean(first)?, stats::mean(second)?))
}

fn signed(percent: f64) -> String {
    if percent > 0.0 {
        format!("+{percent:.1}")
    } else {
        format!("{percent:.1}")
    }
}

fn direction(increase: bool) -> &'static str {
    if increase {
        "increase"
    } else {
        "decrease"
    }
}

/// Trend verdict for values ordered oldest first, covering `days` days.
pub fn analyze_trend(values: &[f64], days: u32, config: &TrendConfig) -> AnalysisResult {
    let Some((first_mean, second_mean)) = half_means(values) else {
        debug!(count = values.len(), "Trend analysis skipped: insufficient data");
        return AnalysisResult::info(INSUFFICIENT_DATA_MESSAGE, 0.5);
    };

    let change = percent_change(first_mean, second_mean);
    debug!(first_mean, second_mean, ?change, "Trend computed");

    match change {
        Change::Unbounded { increase } => AnalysisResult::new(
            Severity::Critical,
            format!(
                "Significant {} detected from a zero baseline over {} days",
                direction(increase),
                days
            ),
            0.85,
        )
        .with_recommendations(&CRITICAL_RECOMMENDATIONS),
        Change::Percent(pct) if pct.abs() > config.critical_percent => AnalysisResult::new(
            Severity::Critical,
            format!(
                "Significant {} detected: {:.1}% change over {} days",
                direction(pct > 0.0),
                pct.abs(),
                days
            ),
            0.85,
        )
        .with_recommendations(&CRITICAL_RECOMMENDATIONS),
        Change::Percent(pct) if pct.abs() > config.warning_percent => AnalysisResult::new(
            Severity::Warning,
            format!("Moderate trend detected: {}% change over {} days", signed(pct), days),
            0.75,
        )
        .with_recommendations(&WARNING_RECOMMENDATIONS),
        Change::Percent(pct) => AnalysisResult::info(
            format!("Stable trend: {}% change over {} days", signed(pct), days),
            0.8,
        ),
    }
}
