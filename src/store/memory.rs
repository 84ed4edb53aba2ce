//! In-memory store for tests and minimal deployments
//!
//! Thread-safe via `RwLock`. Not durable: data lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use super::{DataSink, DataStore, StoreError};
use crate::types::{Issue, Measurement};

#[derive(Default)]
pub struct InMemoryStore {
    measurements: RwLock<HashMap<String, Vec<Measurement>>>,
    issues: RwLock<Vec<Issue>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a layer with readings (any order).
    pub fn with_measurements(self, layer_id: &str, measurements: Vec<Measurement>) -> Self {
        if let Ok(mut layers) = self.measurements.write() {
            layers
                .entry(layer_id.to_string())
                .or_default()
                .extend(measurements);
        }
        self
    }

    /// Seed issue records (any order).
    pub fn with_issues(self, issues: Vec<Issue>) -> Self {
        if let Ok(mut store) = self.issues.write() {
            store.extend(issues);
        }
        self
    }

    /// Simulate an unreachable backend: every call fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store set offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn sorted_layer(&self, layer_id: &str) -> Result<Vec<Measurement>, StoreError> {
        let layers = self.measurements.read().map_err(|_| StoreError::Poisoned)?;
        let mut series = layers.get(layer_id).cloned().unwrap_or_default();
        series.sort_by_key(|m| m.recorded_at);
        Ok(series)
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn fetch_measurements(
        &self,
        layer_id: &str,
        limit: usize,
        descending: bool,
    ) -> Result<Vec<Measurement>, StoreError> {
        self.check_online()?;
        let mut series = self.sorted_layer(layer_id)?;
        if descending {
            series.reverse();
        }
        series.truncate(limit);
        Ok(series)
    }

    async fn fetch_measurements_since(
        &self,
        layer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, StoreError> {
        self.check_online()?;
        let series = self.sorted_layer(layer_id)?;
        Ok(series.into_iter().filter(|m| m.recorded_at >= since).collect())
    }

    async fn fetch_issues(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Issue>, StoreError> {
        self.check_online()?;
        let store = self.issues.read().map_err(|_| StoreError::Poisoned)?;
        let mut issues: Vec<Issue> = store
            .iter()
            .filter(|i| category.map_or(true, |c| i.category == c))
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        issues.truncate(limit);
        Ok(issues)
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

#[async_trait]
impl DataSink for InMemoryStore {
    async fn insert_measurement(
        &self,
        layer_id: &str,
        measurement: &Measurement,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut layers = self.measurements.write().map_err(|_| StoreError::Poisoned)?;
        layers
            .entry(layer_id.to_string())
            .or_default()
            .push(measurement.clone());
        Ok(())
    }

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        self.check_online()?;
        let mut store = self.issues.write().map_err(|_| StoreError::Poisoned)?;
        store.push(issue.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reading(minutes: i64, value: f64) -> Measurement {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Measurement::new(40.0, -3.7, value, base + Duration::minutes(minutes))
    }

    #[tokio::test]
    async fn test_fetch_descending_with_limit() {
        let store = InMemoryStore::new().with_measurements(
            "air",
            vec![reading(2, 2.0), reading(0, 0.0), reading(1, 1.0)],
        );
        let latest = store.fetch_measurements("air", 2, true).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert!((latest[0].value - 2.0).abs() < f64::EPSILON);
        assert!((latest[1].value - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fetch_since_is_ascending() {
        let store = InMemoryStore::new().with_measurements(
            "air",
            vec![reading(30, 3.0), reading(10, 1.0), reading(20, 2.0)],
        );
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 0, 15, 0).unwrap();
        let series = store.fetch_measurements_since("air", since).await.unwrap();
        let values: Vec<f64> = series.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_unknown_layer_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.fetch_measurements("nope", 10, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let err = store.fetch_issues(None, 10).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_trait_object() {
        let store: Box<dyn DataStore> = Box::new(InMemoryStore::new());
        assert_eq!(store.backend_name(), "InMemory");
    }
}
