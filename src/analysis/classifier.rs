//! Keyword-based issue priority classifier.
//!
//! Tiers are checked in order and the first match wins. Matching is a
//! case-insensitive substring search over the description; the `safety`
//! category is always critical regardless of wording.

use crate::types::{Priority, PriorityClassification};

/// Category that is always classified critical.
pub const SAFETY_CATEGORY: &str = "safety";

pub const CRITICAL_KEYWORDS: [&str; 6] =
    ["emergency", "dangerous", "urgent", "severe", "critical", "immediate"];
pub const HIGH_KEYWORDS: [&str; 5] = ["serious", "major", "significant", "important", "concerning"];
pub const MEDIUM_KEYWORDS: [&str; 4] = ["moderate", "noticeable", "issue", "problem"];

/// (priority, confidence, keywords) per tier, most severe first.
const TIERS: [(Priority, f64, &[&str]); 3] = [
    (Priority::Critical, 0.85, &CRITICAL_KEYWORDS),
    (Priority::High, 0.75, &HIGH_KEYWORDS),
    (Priority::Medium, 0.65, &MEDIUM_KEYWORDS),
];

const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Suggest a priority for an issue from its description and category.
pub fn classify(description: &str, category: &str) -> PriorityClassification {
    let description = description.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|kw| description.contains(kw));

    if category.eq_ignore_ascii_case(SAFETY_CATEGORY) {
        let (priority, confidence, _) = TIERS[0];
        return PriorityClassification { priority, confidence };
    }

    TIERS
        .iter()
        .find(|(_, _, keywords)| mentions(*keywords))
        .map_or(
            PriorityClassification {
                priority: Priority::Low,
                confidence: FALLBACK_CONFIDENCE,
            },
            |&(priority, confidence, _)| PriorityClassification { priority, confidence },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_overrides_category() {
        let c = classify("emergency flooding", "infrastructure");
        assert_eq!(c.priority, Priority::Critical);
        assert!((c.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_keyword_is_low() {
        let c = classify("minor pothole", "other");
        assert_eq!(c.priority, Priority::Low);
        assert!((c.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_safety_category_is_critical() {
        let c = classify("broken bench", "safety");
        assert_eq!(c.priority, Priority::Critical);
        assert_eq!(classify("broken bench", "Safety").priority, Priority::Critical);
    }

    #[test]
    fn test_tiers_in_order() {
        assert_eq!(classify("A MAJOR leak", "water").priority, Priority::High);
        assert_eq!(classify("noticeable smell", "pollution").priority, Priority::Medium);
        // Critical keyword wins over a high keyword in the same text
        assert_eq!(classify("serious and urgent", "noise").priority, Priority::Critical);
    }

    #[test]
    fn test_substring_matching() {
        // "issues" contains "issue"
        let c = classify("recurring issues with lights", "lighting");
        assert_eq!(c.priority, Priority::Medium);
        assert!((c.confidence - 0.65).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_description_is_low() {
        assert_eq!(classify("", "traffic").priority, Priority::Low);
    }
}
