//! Sled-backed store
//!
//! Two trees:
//! - `layer_data`: key `{layer_id}\0{recorded_at_nanos_be}{seq_be}` → JSON `Measurement`
//! - `issues`: key `{created_at_nanos_be}{id}` → JSON `Issue`
//!
//! Big-endian timestamps make sled's lexicographic order chronological, so
//! "most recent first" is a reverse range scan. Timestamps are stored with
//! the sign bit flipped so pre-1970 instants still sort before later ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{DataSink, DataStore, StoreError};
use crate::types::{Issue, Measurement};

const LAYER_TREE: &str = "layer_data";
const ISSUE_TREE: &str = "issues";

/// Persistent store for measurements and issues.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
    layers: sled::Tree,
    issues: sled::Tree,
}

impl SledStore {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        info!("Sled store opened at {:?}", path_ref);
        Self::from_db(db)
    }

    /// Open a throwaway store (tests, demos).
    pub fn open_temp() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, StoreError> {
        let layers = db.open_tree(LAYER_TREE)?;
        let issues = db.open_tree(ISSUE_TREE)?;
        Ok(Self {
            db: Arc::new(db),
            layers,
            issues,
        })
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Counts of stored measurements and issues.
    pub fn stats(&self) -> (usize, usize) {
        (self.layers.len(), self.issues.len())
    }

    fn layer_prefix(layer_id: &str) -> Vec<u8> {
        let mut prefix = layer_id.as_bytes().to_vec();
        prefix.push(0);
        prefix
    }

    fn time_key(ts: DateTime<Utc>) -> [u8; 8] {
        let nanos = ts
            .timestamp_nanos_opt()
            .unwrap_or_else(|| ts.timestamp().saturating_mul(1_000_000_000));
        // Flip the sign bit so negative instants order before positive ones
        ((nanos as u64) ^ (1 << 63)).to_be_bytes()
    }

    fn measurement_key(&self, layer_id: &str, ts: DateTime<Utc>) -> Result<Vec<u8>, StoreError> {
        let mut key = Self::layer_prefix(layer_id);
        key.extend_from_slice(&Self::time_key(ts));
        // Disambiguates readings sharing a timestamp
        key.extend_from_slice(&self.db.generate_id()?.to_be_bytes());
        Ok(key)
    }

    fn decode<T: serde::de::DeserializeOwned>(value: &[u8]) -> Option<T> {
        match serde_json::from_slice::<T>(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Failed to deserialize stored record: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl DataStore for SledStore {
    async fn fetch_measurements(
        &self,
        layer_id: &str,
        limit: usize,
        descending: bool,
    ) -> Result<Vec<Measurement>, StoreError> {
        let scan = self.layers.scan_prefix(Self::layer_prefix(layer_id));
        let iter: Box<dyn Iterator<Item = sled::Result<(sled::IVec, sled::IVec)>>> = if descending {
            Box::new(scan.rev())
        } else {
            Box::new(scan)
        };

        let mut out = Vec::new();
        for item in iter {
            if out.len() >= limit {
                break;
            }
            let (_key, value) = item?;
            if let Some(m) = Self::decode::<Measurement>(&value) {
                out.push(m);
            }
        }

        debug!(layer_id = %layer_id, count = out.len(), "Fetched measurements");
        Ok(out)
    }

    async fn fetch_measurements_since(
        &self,
        layer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, StoreError> {
        let prefix = Self::layer_prefix(layer_id);
        let mut start = prefix.clone();
        start.extend_from_slice(&Self::time_key(since));

        let mut out = Vec::new();
        for item in self.layers.range(start..) {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            if let Some(m) = Self::decode::<Measurement>(&value) {
                out.push(m);
            }
        }

        debug!(layer_id = %layer_id, since = %since, count = out.len(), "Fetched measurements since");
        Ok(out)
    }

    async fn fetch_issues(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Issue>, StoreError> {
        let mut out = Vec::new();
        for item in self.issues.iter().rev() {
            if out.len() >= limit {
                break;
            }
            let (_key, value) = item?;
            let Some(issue) = Self::decode::<Issue>(&value) else {
                continue;
            };
            if category.map_or(true, |c| issue.category == c) {
                out.push(issue);
            }
        }

        debug!(category = ?category, count = out.len(), "Fetched issues");
        Ok(out)
    }

    fn backend_name(&self) -> &'static str {
        "Sled"
    }
}

#[async_trait]
impl DataSink for SledStore {
    async fn insert_measurement(
        &self,
        layer_id: &str,
        measurement: &Measurement,
    ) -> Result<(), StoreError> {
        let key = self.measurement_key(layer_id, measurement.recorded_at)?;
        let value = serde_json::to_vec(measurement)?;
        self.layers.insert(key, value)?;
        Ok(())
    }

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        let mut key = Self::time_key(issue.created_at).to_vec();
        key.extend_from_slice(issue.id.as_bytes());
        let value = serde_json::to_vec(issue)?;
        self.issues.insert(key, value)?;
        debug!(id = %issue.id, category = %issue.category, "Stored issue");
        Ok(())
    }
}
