//! Analytics Configuration - All analysis thresholds as operator-tunable TOML values
//!
//! Each struct implements `Default` with the documented analysis constants,
//! so running without a config file reproduces the reference behaviour.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "URBAN_PULSE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "urban_pulse.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an analytics deployment.
///
/// Load with `AnalyticsConfig::load()` which searches:
/// 1. `$URBAN_PULSE_CONFIG`
/// 2. `./urban_pulse.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Deployment identification
    #[serde(default)]
    pub city: CityInfo,

    /// Anomaly detector thresholds
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Trend analyzer thresholds
    #[serde(default)]
    pub trend: TrendConfig,

    /// Quality predictor tuning
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Hotspot grid and category aggregation
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Alert generation policy
    #[serde(default)]
    pub alerts: AlertConfig,

    /// HTTP server and storage
    #[serde(default)]
    pub server: ServerConfig,
}

impl AnalyticsConfig {
    /// Load configuration using the standard search order.
    ///
    /// A file that fails to parse or validate is logged and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), city = %config.city.name, "Loaded analytics config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(city = %config.city.name, "Loaded analytics config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Critical thresholds must be above warning thresholds
    /// - Sample minima and limits must be > 0
    /// - Grid size must be positive
    /// - Confidence bounds must satisfy 0 <= min <= max <= 1
    /// - Every value must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let a = &self.anomaly;
        Self::check_escalation(a.warning_z, a.critical_z, "anomaly.z", &mut errors);
        if a.warning_z < 0.0 {
            errors.push("anomaly.warning_z must be >= 0".to_string());
        }
        if a.min_samples == 0 {
            errors.push("anomaly.min_samples must be > 0".to_string());
        }
        if a.fetch_limit < a.min_samples {
            errors.push(format!(
                "anomaly.fetch_limit ({}) must be >= min_samples ({})",
                a.fetch_limit, a.min_samples
            ));
        }

        let t = &self.trend;
        Self::check_escalation(t.warning_percent, t.critical_percent, "trend.percent", &mut errors);
        if t.default_days == 0 {
            errors.push("trend.default_days must be > 0".to_string());
        }

        let p = &self.prediction;
        if p.min_samples < 2 {
            errors.push("prediction.min_samples must be >= 2 for a regression".to_string());
        }
        if p.history_limit < p.min_samples {
            errors.push(format!(
                "prediction.history_limit ({}) must be >= min_samples ({})",
                p.history_limit, p.min_samples
            ));
        }
        if !p.stable_slope.is_finite() || p.stable_slope < 0.0 {
            errors.push("prediction.stable_slope must be a finite value >= 0".to_string());
        }
        let confidence_ok = p.min_confidence.is_finite()
            && p.max_confidence.is_finite()
            && (0.0..=1.0).contains(&p.min_confidence)
            && (0.0..=1.0).contains(&p.max_confidence)
            && p.min_confidence <= p.max_confidence;
        if !confidence_ok {
            errors.push(format!(
                "prediction confidence bounds must satisfy 0 <= min ({}) <= max ({}) <= 1",
                p.min_confidence, p.max_confidence
            ));
        }

        let g = &self.patterns;
        if !g.grid_size_deg.is_finite() || g.grid_size_deg <= 0.0 {
            errors.push("patterns.grid_size_deg must be > 0".to_string());
        }
        if g.min_hotspot_count == 0 {
            errors.push("patterns.min_hotspot_count must be > 0".to_string());
        }
        if g.issue_limit == 0 {
            errors.push("patterns.issue_limit must be > 0".to_string());
        }

        let al = &self.alerts;
        Self::check_escalation(
            al.elevated_priority,
            al.critical_priority,
            "alerts.priority",
            &mut errors,
        );
        if !(1.0..=4.0).contains(&al.elevated_priority) {
            errors.push(format!(
                "alerts.elevated_priority ({}) must lie in the ordinal range 1-4",
                al.elevated_priority
            ));
        }

        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(warning: f64, critical: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, catch them explicitly
        if !warning.is_finite() || !critical.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got warning={warning}, critical={critical})"
            ));
            return;
        }
        if critical < warning {
            errors.push(format!(
                "{name}: critical ({critical:.3}) must be >= warning ({warning:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// City Info
// ============================================================================

/// Identification metadata. Appears in logs and the health endpoint only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInfo {
    #[serde(default = "default_city_name")]
    pub name: String,

    #[serde(default)]
    pub region: String,
}

fn default_city_name() -> String {
    "DEFAULT".to_string()
}

impl Default for CityInfo {
    fn default() -> Self {
        Self {
            name: default_city_name(),
            region: String::new(),
        }
    }
}

// ============================================================================
// Anomaly Detector
// ============================================================================

/// Z-score anomaly detection over a layer's recent readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Readings required before statistics are attempted.
    #[serde(default = "default_anomaly_min_samples")]
    pub min_samples: usize,

    /// z-score strictly above which a reading is a warning.
    #[serde(default = "default_anomaly_warning_z")]
    pub warning_z: f64,

    /// z-score strictly above which a reading is critical.
    #[serde(default = "default_anomaly_critical_z")]
    pub critical_z: f64,

    /// Most recent readings fetched per pass.
    #[serde(default = "default_anomaly_fetch_limit")]
    pub fetch_limit: usize,
}

fn default_anomaly_min_samples() -> usize { defaults::ANOMALY_MIN_SAMPLES }
fn default_anomaly_warning_z() -> f64 { defaults::ANOMALY_WARNING_Z }
fn default_anomaly_critical_z() -> f64 { defaults::ANOMALY_CRITICAL_Z }
fn default_anomaly_fetch_limit() -> usize { defaults::ANOMALY_FETCH_LIMIT }

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_samples: default_anomaly_min_samples(),
            warning_z: default_anomaly_warning_z(),
            critical_z: default_anomaly_critical_z(),
            fetch_limit: default_anomaly_fetch_limit(),
        }
    }
}

// ============================================================================
// Trend Analyzer
// ============================================================================

/// Early-vs-late window comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Look-back window when the caller does not specify one (days).
    #[serde(default = "default_trend_days")]
    pub default_days: u32,

    /// |percent change| strictly above which the trend is a warning.
    #[serde(default = "default_trend_warning")]
    pub warning_percent: f64,

    /// |percent change| strictly above which the trend is critical.
    #[serde(default = "default_trend_critical")]
    pub critical_percent: f64,
}

fn default_trend_days() -> u32 { defaults::TREND_DEFAULT_DAYS }
fn default_trend_warning() -> f64 { defaults::TREND_WARNING_PERCENT }
fn default_trend_critical() -> f64 { defaults::TREND_CRITICAL_PERCENT }

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            default_days: default_trend_days(),
            warning_percent: default_trend_warning(),
            critical_percent: default_trend_critical(),
        }
    }
}

// ============================================================================
// Quality Predictor
// ============================================================================

/// Least-squares extrapolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_prediction_history")]
    pub history_limit: usize,

    #[serde(default = "default_prediction_min_samples")]
    pub min_samples: usize,

    #[serde(default = "default_prediction_hours")]
    pub default_hours_ahead: u32,

    /// |slope| below which the trend is "stable".
    #[serde(default = "default_prediction_stable_slope")]
    pub stable_slope: f64,

    #[serde(default = "default_prediction_max_confidence")]
    pub max_confidence: f64,

    #[serde(default = "default_prediction_min_confidence")]
    pub min_confidence: f64,
}

fn default_prediction_history() -> usize { defaults::PREDICTION_HISTORY_LIMIT }
fn default_prediction_min_samples() -> usize { defaults::PREDICTION_MIN_SAMPLES }
fn default_prediction_hours() -> u32 { defaults::PREDICTION_DEFAULT_HOURS_AHEAD }
fn default_prediction_stable_slope() -> f64 { defaults::PREDICTION_STABLE_SLOPE }
fn default_prediction_max_confidence() -> f64 { defaults::PREDICTION_MAX_CONFIDENCE }
fn default_prediction_min_confidence() -> f64 { defaults::PREDICTION_MIN_CONFIDENCE }

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_prediction_history(),
            min_samples: default_prediction_min_samples(),
            default_hours_ahead: default_prediction_hours(),
            stable_slope: default_prediction_stable_slope(),
            max_confidence: default_prediction_max_confidence(),
            min_confidence: default_prediction_min_confidence(),
        }
    }
}

// ============================================================================
// Issue Patterns
// ============================================================================

/// Spatial grid bucketing and category aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Cell size in degrees for both latitude and longitude.
    #[serde(default = "default_grid_size")]
    pub grid_size_deg: f64,

    #[serde(default = "default_min_hotspot_count")]
    pub min_hotspot_count: usize,

    #[serde(default = "default_max_hotspots")]
    pub max_hotspots: usize,

    /// Most recent issues fetched per analysis.
    #[serde(default = "default_issue_limit")]
    pub issue_limit: usize,
}

fn default_grid_size() -> f64 { defaults::GRID_SIZE_DEG }
fn default_min_hotspot_count() -> usize { defaults::MIN_HOTSPOT_COUNT }
fn default_max_hotspots() -> usize { defaults::MAX_HOTSPOTS }
fn default_issue_limit() -> usize { defaults::PATTERN_ISSUE_LIMIT }

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            grid_size_deg: default_grid_size(),
            min_hotspot_count: default_min_hotspot_count(),
            max_hotspots: default_max_hotspots(),
            issue_limit: default_issue_limit(),
        }
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Which pattern findings become alerts, and how severe they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_hotspot_alerts")]
    pub hotspot_alerts: usize,

    #[serde(default = "default_category_alerts")]
    pub category_alerts: usize,

    /// Hotspot count strictly above which the alert is critical.
    #[serde(default = "default_critical_hotspot_count")]
    pub critical_hotspot_count: usize,

    /// Average priority strictly above which a category alert is raised.
    #[serde(default = "default_elevated_priority")]
    pub elevated_priority: f64,

    /// Average priority strictly above which the category alert is critical.
    #[serde(default = "default_critical_priority")]
    pub critical_priority: f64,
}

fn default_hotspot_alerts() -> usize { defaults::HOTSPOT_ALERTS }
fn default_category_alerts() -> usize { defaults::CATEGORY_ALERTS }
fn default_critical_hotspot_count() -> usize { defaults::CRITICAL_HOTSPOT_COUNT }
fn default_elevated_priority() -> f64 { defaults::ELEVATED_PRIORITY }
fn default_critical_priority() -> f64 { defaults::CRITICAL_PRIORITY }

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            hotspot_alerts: default_hotspot_alerts(),
            category_alerts: default_category_alerts(),
            critical_hotspot_count: default_critical_hotspot_count(),
            elevated_priority: default_elevated_priority(),
            critical_priority: default_critical_priority(),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server and storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_addr")]
    pub addr: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_server_addr() -> String { defaults::DEFAULT_SERVER_ADDR.to_string() }
fn default_data_dir() -> String { defaults::DEFAULT_DATA_DIR.to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            data_dir: default_data_dir(),
        }
    }
}
