//! Config validation: unknown-key detection with "did you mean?" suggestions.
//!
//! The raw TOML is parsed into a `toml::Value` first and its key tree compared
//! against the known field paths. Unknown keys produce warnings only, so a
//! typo never prevents startup, but it never goes unnoticed either.

use std::collections::HashSet;

/// A non-fatal config warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

/// Maximum edit distance for a suggestion to be offered.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Every valid dotted key path of `AnalyticsConfig`.
///
/// Maintained by hand alongside `analytics_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        "city",
        "city.name",
        "city.region",
        "anomaly",
        "anomaly.min_samples",
        "anomaly.warning_z",
        "anomaly.critical_z",
        "anomaly.fetch_limit",
        "trend",
        "trend.default_days",
        "trend.warning_percent",
        "trend.critical_percent",
        "prediction",
        "prediction.history_limit",
        "prediction.min_samples",
        "prediction.default_hours_ahead",
        "prediction.stable_slope",
        "prediction.max_confidence",
        "prediction.min_confidence",
        "patterns",
        "patterns.grid_size_deg",
        "patterns.min_hotspot_count",
        "patterns.max_hotspots",
        "patterns.issue_limit",
        "alerts",
        "alerts.hotspot_alerts",
        "alerts.category_alerts",
        "alerts.critical_hotspot_count",
        "alerts.elevated_priority",
        "alerts.critical_priority",
        "server",
        "server.addr",
        "server.data_dir",
    ]
    .into_iter()
    .collect()
}

/// Collect all dotted key paths in a TOML tree, tables included.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if v.is_table() {
            keys.push(path.clone());
            keys.extend(walk_toml_keys(v, &path));
        } else {
            keys.push(path);
        }
    }
    keys
}

/// Levenshtein edit distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b_chars.len()]
}

/// Closest known key within `MAX_SUGGESTION_DISTANCE`, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (edit_distance(unknown, k), *k))
        .filter(|(d, _)| *d <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, k)| k.to_string())
}

/// Warnings for every unknown key in a raw TOML document.
///
/// Syntax errors yield no warnings; serde reports them during the real parse.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            message: format!("Unknown config key '{key}'"),
            suggestion: suggest_correction(&key, &known),
            field: key,
        })
        .collect()
}
