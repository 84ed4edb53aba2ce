//! Spatial hotspot clustering and category aggregation over issues.
//!
//! Issues are bucketed into a fixed lat/lng grid. Cells are identified by
//! their integer index `floor(coord / grid)`, which rounds toward negative
//! infinity, so southern and western coordinates land in the cell whose
//! origin lies at or below them. Cell origins are `index * grid`.
//!
//! Ties in the descending sorts keep first-seen order, which for a
//! most-recent-first issue feed means the freshest cell wins a tie.

use std::collections::HashMap;
use tracing::debug;

use crate::config::PatternConfig;
use crate::types::{CategorySummary, Hotspot, Issue, IssuePatterns};

/// Integer grid cell containing a coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub lat_index: i64,
    pub lng_index: i64,
}

impl GridCell {
    pub fn containing(latitude: f64, longitude: f64, grid_size: f64) -> Self {
        Self {
            lat_index: (latitude / grid_size).floor() as i64,
            lng_index: (longitude / grid_size).floor() as i64,
        }
    }

    /// South-west corner of the cell.
    pub fn origin(&self, grid_size: f64) -> (f64, f64) {
        (self.lat_index as f64 * grid_size, self.lng_index as f64 * grid_size)
    }
}

#[derive(Debug)]
struct CellTally {
    cell: GridCell,
    count: usize,
    categories: Vec<String>,
}

#[derive(Debug)]
struct CategoryTally {
    category: String,
    count: usize,
    total_priority: u64,
}

/// Group issues by grid cell and keep the busiest cells.
pub fn find_hotspots(issues: &[Issue], config: &PatternConfig) -> Vec<Hotspot> {
    let mut index: HashMap<GridCell, usize> = HashMap::new();
    let mut cells: Vec<CellTally> = Vec::new();

    for issue in issues {
        let cell = GridCell::containing(issue.latitude, issue.longitude, config.grid_size_deg);
        let slot = *index.entry(cell).or_insert_with(|| {
            cells.push(CellTally {
                cell,
                count: 0,
                categories: Vec::new(),
            });
            cells.len() - 1
        });
        let tally = &mut cells[slot];
        tally.count += 1;
        if !tally.categories.contains(&issue.category) {
            tally.categories.push(issue.category.clone());
        }
    }

    let mut hotspots: Vec<Hotspot> = cells
        .into_iter()
        .filter(|t| t.count >= config.min_hotspot_count)
        .map(|t| {
            let (latitude, longitude) = t.cell.origin(config.grid_size_deg);
            Hotspot {
                latitude,
                longitude,
                count: t.count,
                categories: t.categories,
            }
        })
        .collect();

    hotspots.sort_by(|a, b| b.count.cmp(&a.count));
    hotspots.truncate(config.max_hotspots);
    hotspots
}

/// Count issues and average ordinal priority per category, busiest first.
pub fn summarize_categories(issues: &[Issue]) -> Vec<CategorySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<CategoryTally> = Vec::new();

    for issue in issues {
        let slot = *index.entry(issue.category.as_str()).or_insert_with(|| {
            tallies.push(CategoryTally {
                category: issue.category.clone(),
                count: 0,
                total_priority: 0,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.count += 1;
        tally.total_priority += u64::from(issue.priority_ordinal());
    }

    let mut summaries: Vec<CategorySummary> = tallies
        .into_iter()
        .map(|t| CategorySummary {
            avg_priority: t.total_priority as f64 / t.count as f64,
            category: t.category,
            count: t.count,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Hotspots and category summaries for a batch of issues.
pub fn analyze_patterns(issues: &[Issue], config: &PatternConfig) -> IssuePatterns {
    let hotspots = find_hotspots(issues, config);
    let top_categories = summarize_categories(issues);
    debug!(
        issues = issues.len(),
        hotspots = hotspots.len(),
        categories = top_categories.len(),
        "Issue patterns analyzed"
    );
    IssuePatterns {
        hotspots,
        top_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::issue_status;
    use chrono::Utc;

    fn issue(lat: f64, lng: f64, category: &str, priority: &str) -> Issue {
        Issue {
            id: format!("{lat},{lng},{category}"),
            title: String::new(),
            description: String::new(),
            latitude: lat,
            longitude: lng,
            category: category.to_string(),
            priority: priority.to_string(),
            status: issue_status::REPORTED.to_string(),
            created_at: Utc::now(),
            ai_classified: false,
            ai_confidence: None,
        }
    }

    #[test]
    fn test_three_in_one_cell_make_a_hotspot() {
        let issues = vec![
            issue(10.001, 20.001, "traffic", "low"),
            issue(10.004, 20.002, "noise", "low"),
            issue(10.006, 20.009, "traffic", "low"),
            issue(11.0, 20.0, "waste", "low"),
        ];
        let hotspots = find_hotspots(&issues, &PatternConfig::default());
        assert_eq!(hotspots.len(), 1);
        let h = &hotspots[0];
        assert_eq!(h.count, 3);
        assert_eq!(h.categories, vec!["traffic".to_string(), "noise".to_string()]);
        assert!((h.latitude - 10.0).abs() < 1e-9);
        assert!((h.longitude - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_coordinates_floor_toward_negative_infinity() {
        let cell = GridCell::containing(-33.8651, -151.2099, 0.01);
        assert_eq!(cell.lat_index, -3387);
        assert_eq!(cell.lng_index, -15121);

        // Straddling zero must not merge into one cell
        let issues = vec![
            issue(0.001, 0.001, "a", "low"),
            issue(0.002, 0.002, "a", "low"),
            issue(-0.001, -0.001, "a", "low"),
        ];
        assert!(find_hotspots(&issues, &PatternConfig::default()).is_empty());
    }

    #[test]
    fn test_hotspots_sorted_and_capped() {
        let config = PatternConfig {
            max_hotspots: 2,
            ..PatternConfig::default()
        };
        let mut issues = Vec::new();
        for (i, n) in [3usize, 5, 4].iter().enumerate() {
            let lat = 40.0 + i as f64 * 0.1 + 0.005;
            for _ in 0..*n {
                issues.push(issue(lat, -3.705, "lighting", "low"));
            }
        }
        let hotspots = find_hotspots(&issues, &config);
        let counts: Vec<usize> = hotspots.iter().map(|h| h.count).collect();
        assert_eq!(counts, vec![5, 4]);
    }

    #[test]
    fn test_category_average_priority() {
        let issues = vec![
            issue(1.0, 1.0, "traffic", "critical"),
            issue(1.0, 1.0, "traffic", "low"),
            issue(1.0, 1.0, "traffic", "bogus"),
            issue(1.0, 1.0, "noise", "high"),
        ];
        let summaries = summarize_categories(&issues);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, "traffic");
        assert_eq!(summaries[0].count, 3);
        // (4 + 1 + 2) / 3
        assert!((summaries[0].avg_priority - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(summaries[1].category, "noise");
        assert!((summaries[1].avg_priority - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let patterns = analyze_patterns(&[], &PatternConfig::default());
        assert!(patterns.hotspots.is_empty());
        assert!(patterns.top_categories.is_empty());
    }
}
