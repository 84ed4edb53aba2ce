//! Analytics Configuration Module
//!
//! Provides engine configuration loaded from TOML, exposing every analysis
//! threshold as an operator-tunable value.
//!
//! ## Loading Order
//!
//! 1. `URBAN_PULSE_CONFIG` environment variable (path to TOML file)
//! 2. `urban_pulse.toml` in the current working directory
//! 3. Built-in defaults (the documented analysis constants)
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(AnalyticsConfig::load());
//!
//! // Anywhere in the codebase:
//! let z = config::get().anomaly.critical_z;
//! ```

mod analytics_config;
pub mod defaults;
pub mod validation;

pub use analytics_config::*;

use std::sync::OnceLock;

/// Global analytics configuration, initialized once at startup.
static ANALYTICS_CONFIG: OnceLock<AnalyticsConfig> = OnceLock::new();

/// Initialize the global analytics configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: AnalyticsConfig) {
    if ANALYTICS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global analytics configuration, or `None` before `init()`.
pub fn try_get() -> Option<&'static AnalyticsConfig> {
    ANALYTICS_CONFIG.get()
}

/// Get the global configuration, falling back to built-in defaults when
/// `init()` has not been called (library use, tests).
pub fn get() -> AnalyticsConfig {
    try_get().cloned().unwrap_or_default()
}


/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    ANALYTICS_CONFIG.get().is_some()
}
