//! # driftscan-core
//!
//! Core library for driftscan - classifies the delta between two snapshots
//! of the same tabular dataset into schema migrations (columns added or
//! removed) and data drift (row values changing independently of schema),
//! and summarizes drift as reusable change patterns.
//!
//! This crate provides the core functionality that can be used by different
//! interfaces (CLI, bindings, services). The engine is synchronous,
//! allocation-local, and persists nothing: one classification call reads two
//! datasets and returns a four-bucket breakdown.

pub mod breakdown;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod summary;

// Re-export the most commonly used types for convenience
pub use breakdown::{
    dataset_update_breakdown, BreakdownOptions, DatasetUpdate, UpdateBreakdown, UpdateType,
    BUCKET_COLUMN_ADDED, BUCKET_COLUMN_DELETED, BUCKET_DRIFT, BUCKET_NEW_DATA,
};
pub use dataset::{Dataset, Row, Value};
pub use error::{DriftScanError, Result};
pub use evaluator::{
    safe_evaluate, DefaultDriftEvaluator, DriftContext, DriftEvaluation, DriftEvaluator,
};
pub use summary::{pattern_id, summarize_updates, ChangePattern, DriftSummary};
