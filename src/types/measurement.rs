//! Layer measurement types: Measurement, LayerMeasurement

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single geolocated reading belonging to a layer (temperature, air quality, ...).
///
/// Snapshot of externally persisted data; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Measurement {
    pub fn new(latitude: f64, longitude: f64, value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            value,
            recorded_at,
        }
    }
}

/// Measurement tagged with the layer it belongs to.
///
/// Used by the ingest API and the dataset import format, where readings for
/// several layers travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMeasurement {
    pub layer_id: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// Extract the raw values of a series, preserving order.
pub fn values_of(measurements: &[Measurement]) -> Vec<f64> {
    measurements.iter().map(|m| m.value).collect()
}
