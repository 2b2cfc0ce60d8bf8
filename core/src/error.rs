//! Error types for driftscan operations

use thiserror::Error;

/// Result type alias for driftscan operations
pub type Result<T> = std::result::Result<T, DriftScanError>;

/// Errors surfaced by the classification engine
#[derive(Error, Debug)]
pub enum DriftScanError {
    /// Key field or cutoff field missing from one of the input datasets.
    /// Fatal: surfaced to the caller before any breakdown stage runs.
    #[error("Schema error: {0}")]
    Schema(String),

    /// An injected drift evaluator reported failure. Never escapes the
    /// engine; the safety wrapper converts it into a non-alerting evaluation.
    #[error("Drift evaluator error: {0}")]
    Evaluator(String),
}

impl DriftScanError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn evaluator(message: impl Into<String>) -> Self {
        Self::Evaluator(message.into())
    }
}
