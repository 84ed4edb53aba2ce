//! Measurement & Issue Store
//!
//! The analytics engine only reads already-persisted data. This module defines
//! that read contract (`DataStore`), a write contract for ingest (`DataSink`),
//! and two backends:
//! - `InMemoryStore`: fixture for tests, demos and minimal deployments
//! - `SledStore`: embedded on-disk store used by the server binary
//!
//! Retries and timeouts, if any, belong to the backend. A failed fetch is
//! reported as `StoreError` and the analysis call fails with it unchanged.

mod memory;
mod sled_store;

pub use memory::InMemoryStore;
pub use sled_store::SledStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tracing::{info, warn};

use crate::types::{Dataset, Issue, Measurement};

/// Data-access failures raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Read access to layer measurements and issue records.
///
/// Implementations must be thread-safe (Send + Sync) so one handle can be
/// shared by concurrent analysis calls.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Up to `limit` measurements of a layer, newest first when `descending`.
    async fn fetch_measurements(
        &self,
        layer_id: &str,
        limit: usize,
        descending: bool,
    ) -> Result<Vec<Measurement>, StoreError>;

    /// Measurements recorded at or after `since`, oldest first.
    async fn fetch_measurements_since(
        &self,
        layer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, StoreError>;

    /// Up to `limit` issues, most recent first, optionally restricted to a category.
    async fn fetch_issues(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Issue>, StoreError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Write access used by ingest paths (API, dataset import).
#[async_trait]
pub trait DataSink: Send + Sync {
    async fn insert_measurement(
        &self,
        layer_id: &str,
        measurement: &Measurement,
    ) -> Result<(), StoreError>;

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError>;
}

/// A backend that can both serve analyses and accept ingest.
pub trait Store: DataStore + DataSink {}

impl<T: DataStore + DataSink> Store for T {}

/// Write every record of a dataset into a sink.
///
/// Stops at the first failed insert; records written before it stay written
/// and their count is logged. Returns (measurements, issues) written.
pub async fn import_dataset(sink: &dyn DataSink, dataset: &Dataset) -> Result<(usize, usize), StoreError> {
    for (written, lm) in dataset.measurements.iter().enumerate() {
        if let Err(e) = sink.insert_measurement(&lm.layer_id, &lm.measurement).await {
            warn!(measurements = written, issues = 0, "Import stopped partway");
            return Err(e);
        }
    }
    for (written, issue) in dataset.issues.iter().enumerate() {
        if let Err(e) = sink.insert_issue(issue).await {
            warn!(
                measurements = dataset.measurements.len(),
                issues = written,
                "Import stopped partway"
            );
            return Err(e);
        }
    }
    info!(
        measurements = dataset.measurements.len(),
        issues = dataset.issues.len(),
        "Dataset imported"
    );
    Ok((dataset.measurements.len(), dataset.issues.len()))
}
