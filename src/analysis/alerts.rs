//! Alert generation from issue patterns.
//!
//! The busiest hotspots become location alerts; the busiest categories
//! become category alerts only when their average priority is elevated.
//! Hotspot alerts always precede category alerts.

use tracing::debug;

use crate::config::AlertConfig;
use crate::types::{Alert, CategorySummary, Hotspot, IssuePatterns, Severity};

pub const HOTSPOT_ALERT_TITLE: &str = "Issue Hotspot Detected";

fn hotspot_alert(hotspot: &Hotspot, config: &AlertConfig) -> Alert {
    let severity = if hotspot.count > config.critical_hotspot_count {
        Severity::Critical
    } else {
        Severity::Warning
    };
    Alert {
        title: HOTSPOT_ALERT_TITLE.to_string(),
        message: format!(
            "High concentration of {} issues detected. Categories: {}",
            hotspot.count,
            hotspot.categories.join(", ")
        ),
        severity,
        latitude: Some(hotspot.latitude),
        longitude: Some(hotspot.longitude),
    }
}

fn category_alert(summary: &CategorySummary, config: &AlertConfig) -> Option<Alert> {
    if summary.avg_priority <= config.elevated_priority {
        return None;
    }
    let severity = if summary.avg_priority > config.critical_priority {
        Severity::Critical
    } else {
        Severity::Warning
    };
    Some(Alert {
        title: format!("Rising {} Issues", summary.category),
        message: format!(
            "{} {} issues reported with elevated priority",
            summary.count, summary.category
        ),
        severity,
        latitude: None,
        longitude: None,
    })
}

/// Turn analyzed issue patterns into alerts.
pub fn generate_alerts(patterns: &IssuePatterns, config: &AlertConfig) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = patterns
        .hotspots
        .iter()
        .take(config.hotspot_alerts)
        .map(|h| hotspot_alert(h, config))
        .collect();

    alerts.extend(
        patterns
            .top_categories
            .iter()
            .take(config.category_alerts)
            .filter_map(|c| category_alert(c, config)),
    );

    debug!(
        hotspots = patterns.hotspots.len(),
        categories = patterns.top_categories.len(),
        alerts = alerts.len(),
        "Alerts generated"
    );
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(count: usize, categories: &[&str]) -> Hotspot {
        Hotspot {
            latitude: 51.5,
            longitude: -0.12,
            count,
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    fn summary(category: &str, count: usize, avg_priority: f64) -> CategorySummary {
        CategorySummary {
            category: category.to_string(),
            count,
            avg_priority,
        }
    }

    #[test]
    fn test_large_hotspot_is_critical() {
        let patterns = IssuePatterns {
            hotspots: vec![hotspot(15, &["traffic", "noise"])],
            top_categories: vec![],
        };
        let alerts = generate_alerts(&patterns, &AlertConfig::default());
        assert_eq!(alerts.len(), 1);
        let a = &alerts[0];
        assert_eq!(a.title, HOTSPOT_ALERT_TITLE);
        assert_eq!(a.severity, Severity::Critical);
        assert_eq!(a.message, "High concentration of 15 issues detected. Categories: traffic, noise");
        assert_eq!(a.latitude, Some(51.5));
        assert_eq!(a.longitude, Some(-0.12));
    }

    #[test]
    fn test_hotspot_of_exactly_ten_is_warning() {
        let patterns = IssuePatterns {
            hotspots: vec![hotspot(10, &["waste"])],
            top_categories: vec![],
        };
        assert_eq!(generate_alerts(&patterns, &AlertConfig::default())[0].severity, Severity::Warning);
    }

    #[test]
    fn test_only_top_three_hotspots() {
        let patterns = IssuePatterns {
            hotspots: (0..5).map(|i| hotspot(9 - i, &["a"])).collect(),
            top_categories: vec![],
        };
        let alerts = generate_alerts(&patterns, &AlertConfig::default());
        assert_eq!(alerts.len(), 3);
        assert!(alerts[2].message.contains("of 7 issues"));
    }

    #[test]
    fn test_category_alert_thresholds() {
        let patterns = IssuePatterns {
            hotspots: vec![],
            top_categories: vec![summary("water", 8, 3.5), summary("lighting", 6, 2.75)],
        };
        let alerts = generate_alerts(&patterns, &AlertConfig::default());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, "Rising water Issues");
        assert_eq!(alerts[0].message, "8 water issues reported with elevated priority");
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert!(alerts[0].latitude.is_none());
        assert_eq!(alerts[1].severity, Severity::Warning);
    }

    #[test]
    fn test_category_at_threshold_or_beyond_top_two_is_skipped() {
        let patterns = IssuePatterns {
            hotspots: vec![],
            top_categories: vec![
                summary("noise", 20, 2.5),
                summary("parks", 10, 2.0),
                summary("safety", 5, 4.0),
            ],
        };
        assert!(generate_alerts(&patterns, &AlertConfig::default()).is_empty());
    }

    #[test]
    fn test_hotspots_precede_categories() {
        let patterns = IssuePatterns {
            hotspots: vec![hotspot(4, &["traffic"])],
            top_categories: vec![summary("traffic", 4, 4.0)],
        };
        let alerts = generate_alerts(&patterns, &AlertConfig::default());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, HOTSPOT_ALERT_TITLE);
        assert_eq!(alerts[1].title, "Rising traffic Issues");
    }

    #[test]
    fn test_no_patterns_no_alerts() {
        assert!(generate_alerts(&IssuePatterns::default(), &AlertConfig::default()).is_empty());
    }
}
