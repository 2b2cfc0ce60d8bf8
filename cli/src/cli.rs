//! Command-line interface for driftscan

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "driftscan")]
#[command(about = "Classifies snapshot deltas into schema migrations and data drift")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Break the delta between two snapshots into migration, new-data, and drift buckets
    Breakdown {
        /// Initial snapshot (CSV)
        initial: PathBuf,

        /// Final snapshot (CSV)
        #[arg(value_name = "FINAL")]
        final_snapshot: PathBuf,

        /// Column that uniquely identifies a row within one snapshot
        #[arg(long, default_value = "unique_key")]
        key_field: String,

        /// Column used to tell newly arrived rows apart from drifted rows
        #[arg(long, default_value = "date")]
        cutoff_field: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
