//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chartwise: zero-configuration chart recommendations for tabular data
#[derive(Parser)]
#[command(name = "chartwise")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend charts and insights for a data file
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the analysis (default: <file>.analysis.json)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// JSON file overriding engine thresholds
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Print the analysis JSON to stdout instead of a summary
        #[arg(long)]
        stdout: bool,
    },

    /// Show the column profiles of a data file
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
