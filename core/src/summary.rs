//! Drift summarizer: decomposes a same-schema dataset pair into added,
//! deleted, and modified rows, and aggregates modified cells into change
//! patterns

use crate::dataset::Dataset;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A recurring cell-level edit: every row key on which `column` went from
/// `old_value` to `new_value`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePattern {
    pub pattern_id: String,
    pub column: String,
    pub old_value: String,
    pub new_value: String,
    pub affected_keys: Vec<String>,
}

/// Row-level drift decomposition plus grouped change patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftSummary {
    pub added_rows: Dataset,
    pub deleted_rows: Dataset,
    pub modified_row_keys: Vec<String>,
    pub modified_patterns: Vec<ChangePattern>,
}

impl DriftSummary {
    pub fn is_empty(&self) -> bool {
        self.added_rows.is_empty()
            && self.deleted_rows.is_empty()
            && self.modified_row_keys.is_empty()
    }
}

/// Deterministic identifier for a change pattern, derived from the
/// (column, old value, new value) triple. Stable across runs so reports and
/// caches can be compared between invocations.
pub fn pattern_id(column: &str, old_value: &str, new_value: &str) -> String {
    let content = format!("{column}||{old_value}||{new_value}");
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Summarize the updates between two datasets sharing the same schema and
/// key field.
///
/// Every cell is coerced to its textual form before comparison. Modified
/// rows are reported in `before`'s row order; patterns in order of first
/// occurrence. Each modified (key, column) cell lands in exactly one
/// pattern, so the pattern list is a partition of the modified cells.
pub fn summarize_updates(before: &Dataset, after: &Dataset) -> DriftSummary {
    let before = before.coerced();
    let after = after.coerced();

    let deleted_keys: Vec<&str> = before.keys().filter(|k| !after.contains_key(k)).collect();
    let deleted_rows = before.reindex(deleted_keys);

    let added_keys: Vec<&str> = after.keys().filter(|k| !before.contains_key(k)).collect();
    let added_rows = after.reindex(added_keys);

    let common_keys: Vec<&str> = before.keys().filter(|k| after.contains_key(k)).collect();

    let mut modified_row_keys = Vec::new();
    let mut pattern_changes: IndexMap<(String, String, String), Vec<String>> = IndexMap::new();

    for key in common_keys {
        let mut row_changed = false;
        for column in before.columns() {
            let old_value = before.cell_text(key, column);
            let new_value = after.cell_text(key, column);
            if old_value != new_value {
                row_changed = true;
                pattern_changes
                    .entry((column.clone(), old_value, new_value))
                    .or_default()
                    .push(key.to_string());
            }
        }
        if row_changed {
            modified_row_keys.push(key.to_string());
        }
    }

    let modified_patterns = pattern_changes
        .into_iter()
        .map(|((column, old_value, new_value), affected_keys)| ChangePattern {
            pattern_id: pattern_id(&column, &old_value, &new_value),
            column,
            old_value,
            new_value,
            affected_keys,
        })
        .collect();

    log::debug!(
        "drift summary: {} added, {} deleted, {} modified",
        added_rows.len(),
        deleted_rows.len(),
        modified_row_keys.len()
    );

    DriftSummary {
        added_rows,
        deleted_rows,
        modified_row_keys,
        modified_patterns,
    }
}
