//! Civic issue types: Issue, Priority, NewIssue, IssueStatus constants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status values used by the reporting workflow.
pub mod issue_status {
    pub const REPORTED: &str = "reported";
    pub const IN_PROGRESS: &str = "in_progress";
    pub const RESOLVED: &str = "resolved";
    pub const CLOSED: &str = "closed";
}

/// Discrete issue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Ordinal used when averaging priorities: low=1 .. critical=4.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Parse a stored priority string. Returns `None` for unrecognized values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geolocated civic issue report.
///
/// `priority` and `status` are kept as the raw stored strings: records written
/// by other tools may carry values outside the known set, and the pattern
/// analyzer has a defined fallback for those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Whether `priority` was assigned by the classifier
    #[serde(default)]
    pub ai_classified: bool,
    /// Classifier confidence when `ai_classified` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_confidence: Option<f64>,
}

impl Issue {
    /// Ordinal priority for averaging; unrecognized priorities count as medium (2).
    pub fn priority_ordinal(&self) -> u8 {
        Priority::parse(&self.priority).map_or(Priority::Medium.ordinal(), Priority::ordinal)
    }
}

/// Payload for reporting a new issue.
///
/// When `priority` is absent the classifier assigns one at intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordinals() {
        assert_eq!(Priority::Low.ordinal(), 1);
        assert_eq!(Priority::Medium.ordinal(), 2);
        assert_eq!(Priority::High.ordinal(), 3);
        assert_eq!(Priority::Critical.ordinal(), 4);
    }

    #[test]
    fn test_unknown_priority_defaults_to_medium() {
        let issue = Issue {
            id: "x".to_string(),
            title: String::new(),
            description: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            category: "noise".to_string(),
            priority: "urgent-ish".to_string(),
            status: issue_status::REPORTED.to_string(),
            created_at: Utc::now(),
            ai_classified: false,
            ai_confidence: None,
        };
        assert_eq!(issue.priority_ordinal(), 2);
    }

    #[test]
    fn test_priority_serde_lowercase() {
        let json = serde_json::to_string(&Priority::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let parsed: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Priority::High);
    }
}
