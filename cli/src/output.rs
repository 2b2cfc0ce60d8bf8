//! Output formatting utilities

use driftscan_core::{DatasetUpdate, UpdateBreakdown};

/// Pretty printer for driftscan output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the four-bucket breakdown as a tree
    pub fn print_breakdown(breakdown: &UpdateBreakdown) {
        println!("🔍 Snapshot Delta Breakdown");
        let buckets: Vec<_> = breakdown.iter().collect();
        for (i, (name, update)) in buckets.iter().enumerate() {
            let last = i == buckets.len() - 1;
            let prefix = if last { "└─" } else { "├─" };
            let marker = if update.has_update { "●" } else { "○" };
            println!(
                "{prefix} {marker} {name} ({} row(s))",
                update.dataset.len()
            );
            let indent = if last { "   " } else { "│  " };
            Self::print_drift_details(update, indent);
        }
    }

    fn print_drift_details(update: &DatasetUpdate, indent: &str) {
        let Some(context) = &update.drift_context else {
            return;
        };
        let summary = &context.summary;
        println!("{indent}├─ Added rows: {}", summary.added_rows.len());
        println!("{indent}├─ Deleted rows: {}", summary.deleted_rows.len());
        println!(
            "{indent}├─ Modified rows: {}",
            summary.modified_row_keys.len()
        );
        for pattern in &summary.modified_patterns {
            println!(
                "{indent}├─ Pattern {}: {} '{}' → '{}' on {} row(s)",
                &pattern.pattern_id[..8.min(pattern.pattern_id.len())],
                pattern.column,
                pattern.old_value,
                pattern.new_value,
                pattern.affected_keys.len()
            );
        }
        if let Some(evaluation) = &update.drift_evaluation {
            let flag = if evaluation.should_alert { "🚨" } else { "✅" };
            println!("{indent}└─ {flag} {}", evaluation.message);
        }
    }
}
