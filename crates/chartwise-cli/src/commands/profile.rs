//! Profile command - show how each column was classified.

use std::path::PathBuf;

use chartwise::{Chartwise, ColumnProfile, Dtype};
use colored::Colorize;

pub fn run(
    file: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (profile, source) = Chartwise::new().profile_file(&file)?;

    if json_output {
        let output = serde_json::json!({
            "file": source.file,
            "format": source.format,
            "hash": source.hash,
            "profile": profile,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Profile of".cyan().bold(),
        source.file.white(),
        profile.row_count,
        profile.col_count
    );
    println!();
    println!(
        "  {:30} {:12} {:>7} {:>7}  {}",
        "column".bold(),
        "type".bold(),
        "unique".bold(),
        "nulls".bold(),
        "details".bold()
    );

    for column in &profile.columns {
        println!(
            "  {:30} {:12} {:>7} {:>7}  {}",
            truncate(&column.name, 30),
            colored_dtype(column.dtype),
            column.unique_count,
            column.null_count,
            details(column)
        );
    }

    Ok(())
}

fn colored_dtype(dtype: Dtype) -> colored::ColoredString {
    let label = format!("{:12}", dtype.label());
    match dtype {
        Dtype::Numeric => label.green(),
        Dtype::Temporal => label.blue(),
        Dtype::Ordinal => label.magenta(),
        Dtype::Nominal => label.normal(),
    }
}

fn details(column: &ColumnProfile) -> String {
    let mut parts = Vec::new();
    if column.is_identifier {
        parts.push("identifier".to_string());
    }
    if column.is_likert {
        parts.push(format!("scale: {}", column.likert_order.join(" > ")));
    }
    if column.is_checkbox {
        parts.push(format!("multi-select: {}", column.checkbox_options.join(", ")));
    }
    if let Some(group) = &column.grid_group {
        parts.push(format!(
            "grid '{}' item '{}'",
            group,
            column.grid_item.as_deref().unwrap_or_default()
        ));
    }
    if let (Some(min), Some(max), Some(mean)) = (column.min, column.max, column.mean) {
        parts.push(format!("{min} to {max}, mean {mean:.2}"));
    }
    if let Some(range) = &column.temporal_range {
        parts.push(format!("{} to {}", range.start, range.end));
    }
    if parts.is_empty() && !column.examples.is_empty() {
        parts.push(format!("e.g. {}", column.examples.join(", ")));
    }
    parts.join("; ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{}...", cut)
    }
}
