//! Pluggable drift evaluation policy
//!
//! The engine invokes an injected [`DriftEvaluator`] exactly once per
//! detected drift, through [`safe_evaluate`], so a broken policy never
//! aborts classification.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::summary::DriftSummary;
use serde::{Deserialize, Serialize};

/// Everything a policy gets to look at: the two aligned datasets the drift
/// was computed over, and the row-level summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftContext {
    pub before: Dataset,
    pub after: Dataset,
    pub summary: DriftSummary,
}

/// Verdict of a drift evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftEvaluation {
    pub should_alert: bool,
    pub message: String,
}

/// Strategy interface deciding whether a drift summary warrants an alert.
/// Injected into the classifier; the alerting transport itself lives
/// downstream.
pub trait DriftEvaluator {
    fn evaluate(&self, context: &DriftContext) -> Result<DriftEvaluation>;
}

/// Default policy: alert whenever drift deleted or modified existing rows
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDriftEvaluator;

impl DriftEvaluator for DefaultDriftEvaluator {
    fn evaluate(&self, context: &DriftContext) -> Result<DriftEvaluation> {
        let summary = &context.summary;
        let deleted = summary.deleted_rows.len();
        let modified = summary.modified_row_keys.len();

        if deleted == 0 && modified == 0 {
            return Ok(DriftEvaluation {
                should_alert: false,
                message: "No drift on existing rows".to_string(),
            });
        }

        Ok(DriftEvaluation {
            should_alert: true,
            message: format!(
                "Drift detected: {deleted} deleted row(s), {modified} modified row(s), {} change pattern(s)",
                summary.modified_patterns.len()
            ),
        })
    }
}

/// Run an evaluator, converting any failure into a non-alerting evaluation
/// that carries the failure description
pub fn safe_evaluate(evaluator: &dyn DriftEvaluator, context: &DriftContext) -> DriftEvaluation {
    match evaluator.evaluate(context) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            log::warn!("Drift evaluator failed: {e}");
            DriftEvaluation {
                should_alert: false,
                message: format!("Drift evaluator failed: {e}"),
            }
        }
    }
}
