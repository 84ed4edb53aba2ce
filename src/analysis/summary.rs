//! Dashboard headline statistics over a batch of issues.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::config::defaults::DAILY_HISTOGRAM_DAYS;
use crate::types::{issue_status, CategoryCount, DailyCount, Issue, IssueStats, Priority};

fn is_active(status: &str) -> bool {
    status == issue_status::REPORTED || status == issue_status::IN_PROGRESS
}

/// Summarize issues for the dashboard.
///
/// The daily histogram covers the 7 calendar days (UTC) ending on `today`,
/// oldest first. Issues with an unrecognized priority are counted in the
/// total but in none of the priority buckets.
pub fn summarize_issues(issues: &[Issue], today: NaiveDate) -> IssueStats {
    let mut stats = IssueStats {
        total: issues.len(),
        ..IssueStats::default()
    };

    let first_day = today - Duration::days(DAILY_HISTOGRAM_DAYS - 1);
    let mut daily: Vec<DailyCount> = (0..DAILY_HISTOGRAM_DAYS)
        .map(|offset| DailyCount {
            date: first_day + Duration::days(offset),
            count: 0,
        })
        .collect();

    let mut category_index: HashMap<&str, usize> = HashMap::new();

    for issue in issues {
        if is_active(&issue.status) {
            stats.active += 1;
        } else if issue.status == issue_status::RESOLVED {
            stats.resolved += 1;
        }

        match Priority::parse(&issue.priority) {
            Some(Priority::Low) => stats.by_priority.low += 1,
            Some(Priority::Medium) => stats.by_priority.medium += 1,
            Some(Priority::High) => stats.by_priority.high += 1,
            Some(Priority::Critical) => {
                stats.by_priority.critical += 1;
                stats.critical += 1;
            }
            None => {}
        }

        let slot = *category_index.entry(issue.category.as_str()).or_insert_with(|| {
            stats.by_category.push(CategoryCount {
                category: issue.category.clone(),
                count: 0,
            });
            stats.by_category.len() - 1
        });
        stats.by_category[slot].count += 1;

        let created = issue.created_at.date_naive();
        if let Ok(offset) = usize::try_from((created - first_day).num_days()) {
            if let Some(day) = daily.get_mut(offset) {
                day.count += 1;
            }
        }
    }

    stats.daily = daily;
    stats
}
