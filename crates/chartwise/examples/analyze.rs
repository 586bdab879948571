//! Example: Analyze a tabular data file with Chartwise.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! Example:
//!   cargo run --example analyze -- sales.csv

use std::env;
use std::path::Path;

use chartwise::{Chartwise, Dtype};

fn main() -> chartwise::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- sales.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Chartwise Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let result = Chartwise::new().analyze(path)?;

    if let Some(source) = &result.source {
        println!("## Source Metadata");
        println!("  File: {}", source.file);
        println!("  Format: {}", source.format);
        println!("  Rows: {}", source.row_count);
        println!("  Columns: {}", source.column_count);
        println!();
    }

    println!("## Profile ({} columns)", result.profile.col_count);
    println!();
    for col in &result.profile.columns {
        let mut notes = Vec::new();
        if col.is_likert {
            notes.push(format!("likert: {}", col.likert_order.join(" > ")));
        }
        if col.is_checkbox {
            notes.push(format!("options: {}", col.checkbox_options.join(", ")));
        }
        if let Some(group) = &col.grid_group {
            notes.push(format!("grid: {group}"));
        }
        if col.dtype == Dtype::Numeric {
            if let (Some(min), Some(max)) = (col.min, col.max) {
                notes.push(format!("range: {min}..{max}"));
            }
        }
        println!(
            "  {:30} {:10} unique={:<5} nulls={:<5} {}",
            col.name,
            col.dtype.label(),
            col.unique_count,
            col.null_count,
            notes.join("; ")
        );
    }
    println!();

    let chart = &result.recommended_chart;
    println!("## Recommended Chart");
    println!("  {} ({}, score {:.3})", chart.title, chart.chart_type.label(), chart.score);
    println!("  {}", chart.description);
    println!();

    println!("## Alternatives");
    for group in result.grouped_alternatives() {
        println!("### {} ({:.3})", group.name, group.score);
        for alt in group.charts {
            println!("  - {} [{:.3}]", alt.title, alt.score);
        }
    }
    println!();

    if let Some(insights) = &result.insights {
        println!("## Insights");
        for insight in insights {
            println!("  - {}", insight);
        }
        println!();
    }

    if let Some(surprise) = &result.surprise {
        println!("## Surprise");
        println!("  {}: {}", surprise.candidate.title, surprise.insight);
        println!();
    }

    println!("{}", separator);

    Ok(())
}
