//! Issue intake: turn a report into a stored `Issue`.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::classifier;
use crate::types::{issue_status, Issue, NewIssue};

/// Build a new issue record from a report.
///
/// A report without a priority is classified from its description and
/// category; the result is marked as machine-assigned.
pub fn intake(report: NewIssue, now: DateTime<Utc>) -> Issue {
    let (priority, ai_classified, ai_confidence) = match report.priority {
        Some(priority) => (priority, false, None),
        None => {
            let suggestion = classifier::classify(&report.description, &report.category);
            (suggestion.priority, true, Some(suggestion.confidence))
        }
    };

    let issue = Issue {
        id: Uuid::new_v4().to_string(),
        title: report.title,
        description: report.description,
        latitude: report.latitude,
        longitude: report.longitude,
        category: report.category,
        priority: priority.as_str().to_string(),
        status: issue_status::REPORTED.to_string(),
        created_at: now,
        ai_classified,
        ai_confidence,
    };
    debug!(id = %issue.id, category = %issue.category, priority = %issue.priority, ai_classified, "Issue intake");
    issue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    fn report(description: &str, category: &str, priority: Option<Priority>) -> NewIssue {
        NewIssue {
            title: "Report".to_string(),
            description: description.to_string(),
            category: category.to_string(),
            latitude: 41.39,
            longitude: 2.17,
            priority,
        }
    }

    #[test]
    fn test_unprioritized_report_is_classified() {
        let now = Utc::now();
        let issue = intake(report("Dangerous exposed wiring", "lighting", None), now);
        assert_eq!(issue.priority, "critical");
        assert!(issue.ai_classified);
        assert_eq!(issue.ai_confidence, Some(0.85));
        assert_eq!(issue.status, issue_status::REPORTED);
        assert_eq!(issue.created_at, now);
        assert!(Uuid::parse_str(&issue.id).is_ok());
    }

    #[test]
    fn test_explicit_priority_is_kept() {
        let issue = intake(report("urgent", "noise", Some(Priority::Low)), Utc::now());
        assert_eq!(issue.priority, "low");
        assert!(!issue.ai_classified);
        assert!(issue.ai_confidence.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = intake(report("x", "y", None), Utc::now());
        let b = intake(report("x", "y", None), Utc::now());
        assert_ne!(a.id, b.id);
    }
}
