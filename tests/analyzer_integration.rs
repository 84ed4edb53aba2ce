//! Analyzer Integration Tests
//!
//! Drive `UrbanAnalyzer` end to end over an `InMemoryStore` fixture: fetch
//! windows, ordering, degraded results, and upstream failure propagation.

use chrono::{Duration, Utc};
use std::sync::Arc;

use urban_pulse::analysis::anomaly::{ALL_NORMAL_MESSAGE, INSUFFICIENT_DATA_MESSAGE};
use urban_pulse::config::AnalyticsConfig;
use urban_pulse::store::{import_dataset, DataStore, InMemoryStore, SledStore};
use urban_pulse::types::{issue_status, LayerMeasurement};
use urban_pulse::{
    AnalysisError, Dataset, Issue, Measurement, Priority, QualityTrend, Severity, UrbanAnalyzer,
};

const LAYER: &str = "fixed-air-quality";

/// Hourly readings ending now, oldest first.
fn hourly(values: &[f64]) -> Vec<Measurement> {
    let now = Utc::now();
    let n = values.len() as i64;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Measurement::new(39.47, -0.376, v, now - Duration::hours(n - i as i64)))
        .collect()
}

fn issue(id: &str, lat: f64, lng: f64, category: &str, priority: Priority, minutes_ago: i64) -> Issue {
    Issue {
        id: id.to_string(),
        title: String::new(),
        description: String::new(),
        latitude: lat,
        longitude: lng,
        category: category.to_string(),
        priority: priority.as_str().to_string(),
        status: issue_status::REPORTED.to_string(),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        ai_classified: false,
        ai_confidence: None,
    }
}

fn analyzer(store: InMemoryStore) -> UrbanAnalyzer {
    UrbanAnalyzer::new(Arc::new(store), AnalyticsConfig::default())
}

#[tokio::test]
async fn anomaly_detection_uses_most_recent_hundred() {
    // 150 readings: an old spike that falls outside the 100-reading window,
    // then flat data.
    let mut values = vec![10.0; 150];
    values[5] = 500.0;
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&values));

    let results = analyzer(store).detect_anomalies(LAYER).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].message, ALL_NORMAL_MESSAGE);
}

#[tokio::test]
async fn anomaly_detection_flags_recent_spike() {
    let mut values = vec![10.0; 30];
    values[29] = 200.0;
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&values));

    let results = analyzer(store).detect_anomalies(LAYER).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].severity, Severity::Critical);
    assert!(results[0].message.contains("value 200.00"));
}

#[tokio::test]
async fn unknown_layer_is_insufficient_data() {
    let results = analyzer(InMemoryStore::new())
        .detect_anomalies("no-such-layer")
        .await
        .unwrap();
    assert_eq!(results[0].message, INSUFFICIENT_DATA_MESSAGE);
}

#[tokio::test]
async fn trend_window_excludes_old_readings() {
    let now = Utc::now();
    let readings = vec![
        // Outside a 7-day window: would make the trend look like a huge drop
        Measurement::new(0.0, 0.0, 1000.0, now - Duration::days(20)),
        Measurement::new(0.0, 0.0, 100.0, now - Duration::days(3)),
        Measurement::new(0.0, 0.0, 100.0, now - Duration::days(2)),
        Measurement::new(0.0, 0.0, 150.0, now - Duration::days(1)),
        Measurement::new(0.0, 0.0, 150.0, now - Duration::hours(1)),
    ];
    let store = InMemoryStore::new().with_measurements(LAYER, readings);
    let result = analyzer(store).analyze_trend(LAYER, None).await.unwrap();

    assert_eq!(result.severity, Severity::Critical);
    assert_eq!(result.message, "Significant increase detected: 50.0% change over 7 days");
}

#[tokio::test]
async fn trend_is_idempotent() {
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&[5.0, 6.0, 7.0, 6.5, 9.0, 8.0]));
    let analyzer = analyzer(store);
    let first = analyzer.analyze_trend(LAYER, Some(3)).await.unwrap();
    let second = analyzer.analyze_trend(LAYER, Some(3)).await.unwrap();
    assert_eq!(first, second);
    assert!(first.message.ends_with("over 3 days"));
}

#[tokio::test]
async fn prediction_orders_history_chronologically() {
    // Inserted newest first; the analyzer must still fit oldest to newest
    let mut readings = hourly(&[10.0, 12.0, 14.0, 16.0, 18.0]);
    readings.reverse();
    let store = InMemoryStore::new().with_measurements(LAYER, readings);

    let p = analyzer(store).predict_quality(LAYER, Some(1)).await.unwrap();
    assert!((p.predicted_value - 20.0).abs() < 1e-9);
    assert_eq!(p.trend, QualityTrend::Declining);
}

#[tokio::test]
async fn prediction_uses_last_fifty_readings() {
    // 50 old falling readings then 50 recent rising ones
    let values: Vec<f64> = (0..50)
        .map(|i| 100.0 - f64::from(i))
        .chain((0..50).map(|i| 10.0 + f64::from(i)))
        .collect();
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&values));

    let p = analyzer(store).predict_quality(LAYER, Some(1)).await.unwrap();
    assert_eq!(p.trend, QualityTrend::Declining);
    assert!((p.predicted_value - 60.0).abs() < 1e-6);
}

#[tokio::test]
async fn prediction_with_short_history_fails() {
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&[1.0, 2.0, 3.0]));
    let err = analyzer(store).predict_quality(LAYER, None).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::InsufficientData { available: 3, required: 5, .. }
    ));
}

#[tokio::test]
async fn offline_store_surfaces_data_access_failure() {
    let store = Arc::new(InMemoryStore::new().with_measurements(LAYER, hourly(&[1.0; 20])));
    store.set_offline(true);
    let analyzer = UrbanAnalyzer::new(store.clone(), AnalyticsConfig::default());

    assert!(matches!(
        analyzer.detect_anomalies(LAYER).await,
        Err(AnalysisError::DataAccess(_))
    ));
    assert!(matches!(
        analyzer.analyze_trend(LAYER, None).await,
        Err(AnalysisError::DataAccess(_))
    ));
    assert!(matches!(
        analyzer.predict_quality(LAYER, None).await,
        Err(AnalysisError::DataAccess(_))
    ));
    assert!(matches!(
        analyzer.generate_alerts().await,
        Err(AnalysisError::DataAccess(_))
    ));
    assert!(matches!(
        analyzer.layer_overview(LAYER).await,
        Err(AnalysisError::DataAccess(_))
    ));

    store.set_offline(false);
    assert!(analyzer.detect_anomalies(LAYER).await.is_ok());
}

#[tokio::test]
async fn overview_without_prediction_history() {
    let store = InMemoryStore::new().with_measurements(LAYER, hourly(&[3.0, 4.0]));
    let overview = analyzer(store).layer_overview(LAYER).await.unwrap();
    assert_eq!(overview.layer_id, LAYER);
    assert!(overview.prediction.is_none());
    assert_eq!(overview.anomalies[0].message, INSUFFICIENT_DATA_MESSAGE);
    assert_eq!(overview.trend.severity, Severity::Critical);
}

#[tokio::test]
async fn hotspot_alert_from_stored_issues() {
    let mut issues: Vec<Issue> = (0..15)
        .map(|i| {
            let category = if i % 2 == 0 { "traffic" } else { "noise" };
            issue(&format!("h{i}"), 40.4168, -3.7038, category, Priority::Low, i)
        })
        .collect();
    issues.push(issue("lone", 41.0, -3.0, "waste", Priority::Low, 100));
    let store = InMemoryStore::new().with_issues(issues);
    let analyzer = analyzer(store);

    let patterns = analyzer.analyze_issue_patterns().await.unwrap();
    assert_eq!(patterns.hotspots.len(), 1);
    assert_eq!(patterns.hotspots[0].count, 15);
    assert_eq!(patterns.hotspots[0].categories, vec!["traffic", "noise"]);

    let alerts = analyzer.generate_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(
        alerts[0].message,
        "High concentration of 15 issues detected. Categories: traffic, noise"
    );
}

#[tokio::test]
async fn category_alert_follows_hotspot_alert() {
    let mut issues: Vec<Issue> = (0..4)
        .map(|i| issue(&format!("s{i}"), 52.52, 13.405, "safety", Priority::Critical, i))
        .collect();
    issues.extend((0..3).map(|i| issue(&format!("p{i}"), 52.60 + i as f64, 13.5, "parks", Priority::Low, 50 + i)));
    let store = InMemoryStore::new().with_issues(issues);

    let alerts = analyzer(store).generate_alerts().await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].title, "Issue Hotspot Detected");
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert_eq!(alerts[1].title, "Rising safety Issues");
    assert_eq!(alerts[1].severity, Severity::Critical);
    assert!(alerts[1].latitude.is_none());
}

#[tokio::test]
async fn patterns_honour_issue_limit() {
    let mut config = AnalyticsConfig::default();
    config.patterns.issue_limit = 3;
    // The three newest are spread out; the older five would form a hotspot
    let mut issues: Vec<Issue> = (0..3)
        .map(|i| issue(&format!("new{i}"), i as f64, 0.0, "waste", Priority::Low, i))
        .collect();
    issues.extend((0..5).map(|i| issue(&format!("old{i}"), 10.0, 10.0, "waste", Priority::Low, 100 + i)));
    let store = InMemoryStore::new().with_issues(issues);

    let analyzer = UrbanAnalyzer::new(Arc::new(store), config);
    let patterns = analyzer.analyze_issue_patterns().await.unwrap();
    assert!(patterns.hotspots.is_empty());
    assert_eq!(patterns.top_categories[0].count, 3);
}

#[tokio::test]
async fn stats_count_today() {
    let issues = vec![
        issue("a", 0.0, 0.0, "traffic", Priority::Critical, 1),
        issue("b", 0.0, 0.0, "traffic", Priority::Low, 2),
    ];
    let store = InMemoryStore::new().with_issues(issues);
    let today = Utc::now().date_naive();
    let stats = analyzer(store).issue_stats(today).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.critical, 1);
    assert_eq!(stats.daily.iter().map(|d| d.count).sum::<usize>(), 2);
}

#[tokio::test]
async fn imported_dataset_is_analysable_from_sled() {
    let store = Arc::new(SledStore::open_temp().unwrap());
    let mut values = vec![20.0; 24];
    values[23] = 90.0;
    let dataset = Dataset {
        measurements: hourly(&values)
            .into_iter()
            .map(|measurement| LayerMeasurement {
                layer_id: LAYER.to_string(),
                measurement,
            })
            .collect(),
        issues: vec![issue("x", 1.0, 1.0, "noise", Priority::High, 5)],
    };

    let (m, i) = import_dataset(store.as_ref(), &dataset).await.unwrap();
    assert_eq!((m, i), (24, 1));
    assert_eq!(store.backend_name(), "Sled");

    let analyzer = UrbanAnalyzer::new(store, AnalyticsConfig::default());
    let anomalies = analyzer.detect_anomalies(LAYER).await.unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].severity, Severity::Critical);

    let p = analyzer.predict_quality(LAYER, Some(1)).await.unwrap();
    assert!(p.predicted_value >= 0.0);
}

#[tokio::test]
async fn global_config_analyzer_uses_defaults() {
    let analyzer = UrbanAnalyzer::with_global_config(Arc::new(InMemoryStore::new()));
    assert_eq!(analyzer.config().prediction.history_limit, 50);
    assert_eq!(analyzer.backend_name(), "InMemory");
}
