//! Shared data structures for the urban analytics engine
//!
//! This module defines the records the engine reads and the results it produces:
//! - Inputs: `Measurement` (layer time-series), `Issue` (geolocated civic reports)
//! - Classification: `Priority`, `PriorityClassification`
//! - Results: `AnalysisResult`, `QualityPrediction`, `IssuePatterns`, `Alert`
//! - Dashboard: `IssueStats`, `LayerDescriptor`
//! - Bulk import: `Dataset`
//!
//! Every result type is `Serialize` so callers can hand it straight to JSON.

mod measurement;
mod issue;
mod analysis;
mod layer;
mod dataset;

pub use measurement::*;
pub use issue::*;
pub use analysis::*;
pub use layer::*;
pub use dataset::*;
