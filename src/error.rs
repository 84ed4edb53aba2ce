//! Analysis error type
//!
//! Statistical edge cases are absorbed by each analysis (they degrade to an
//! `info` result). Only two conditions ever reach the caller: a fetch that
//! failed upstream, and a request that has no sensible degraded answer.

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient data for {operation}: have {available}, need {required}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Data access failure: {0}")]
    DataAccess(#[from] StoreError),
}

pub type AnalysisOutcome<T> = Result<T, AnalysisError>;
