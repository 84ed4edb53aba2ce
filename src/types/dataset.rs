//! Bulk dataset format shared by `urban-pulse import` and the simulation binary

use serde::{Deserialize, Serialize};

use super::{Issue, LayerMeasurement};

/// Measurements for any number of layers plus issue records.
///
/// ```json
/// { "measurements": [{ "layer_id": "fixed-air-quality", "latitude": 0.0, ... }],
///   "issues": [{ "id": "...", "category": "traffic", ... }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub measurements: Vec<LayerMeasurement>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty() && self.issues.is_empty()
    }
}
