//! Command implementations for driftscan CLI

use crate::cli::Commands;
use crate::output::PrettyPrinter;
use anyhow::{Context, Result};
use driftscan_core::{
    dataset_update_breakdown, BreakdownOptions, Dataset, DefaultDriftEvaluator, Row, Value,
};
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Breakdown {
            initial,
            final_snapshot,
            key_field,
            cutoff_field,
            json,
        } => breakdown_command(&initial, &final_snapshot, &key_field, &cutoff_field, json),
    }
}

fn breakdown_command(
    initial_path: &Path,
    final_path: &Path,
    key_field: &str,
    cutoff_field: &str,
    json: bool,
) -> Result<()> {
    let initial = load_csv(initial_path, key_field)?;
    let final_dataset = load_csv(final_path, key_field)?;

    log::info!(
        "loaded {} initial row(s) and {} final row(s)",
        initial.len(),
        final_dataset.len()
    );

    let options = BreakdownOptions {
        cutoff_field: cutoff_field.to_string(),
    };
    let breakdown =
        dataset_update_breakdown(&initial, &final_dataset, &DefaultDriftEvaluator, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        PrettyPrinter::print_breakdown(&breakdown);
    }

    Ok(())
}

/// Load a CSV snapshot into a key-indexed dataset. Every cell is read as
/// text; the engine compares coerced text anyway.
fn load_csv(path: &Path, key_field: &str) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read headers from '{}'", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read record from '{}'", path.display()))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), Value::Text(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Dataset::from_rows(key_field, rows)
        .with_context(|| format!("Failed to index '{}' by '{key_field}'", path.display()))
}
