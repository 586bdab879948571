//! Analyze command - recommend charts for a data file and save the result.

use std::fs;
use std::path::{Path, PathBuf};

use chartwise::{AnalysisResult, Chartwise, EngineConfig};
use colored::Colorize;
use tracing::debug;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    stdout: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = match config {
        Some(path) => {
            debug!(path = %path.display(), "Loading engine config");
            EngineConfig::from_json_file(&path)?
        }
        None => EngineConfig::default(),
    };
    let engine = Chartwise::with_config(config);

    if stdout {
        let result = engine.analyze(&file)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        file.display().to_string().white()
    );

    let result = engine.analyze(&file)?;
    print_summary(&result, verbose);

    let output_path = output.unwrap_or_else(|| default_output_path(&file));
    fs::write(&output_path, serde_json::to_string_pretty(&result)?)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

/// `<dir>/<stem>.analysis.json` next to the input.
fn default_output_path(file: &Path) -> PathBuf {
    let mut p = file.to_path_buf();
    let stem = p.file_stem().unwrap_or_default().to_string_lossy().to_string();
    p.set_file_name(format!("{}.analysis.json", stem));
    p
}

fn print_summary(result: &AnalysisResult, verbose: bool) {
    println!(
        "Profiled {} rows and {} columns, ranked {} charts",
        result.profile.row_count.to_string().white().bold(),
        result.profile.col_count.to_string().white().bold(),
        result.alternatives.len().to_string().white().bold()
    );

    let chart = &result.recommended_chart;
    println!();
    println!("{}", "Recommended:".yellow().bold());
    println!(
        "  {} {} (score {:.3})",
        chart.title.white().bold(),
        format!("[{}]", chart.chart_type.label()).dimmed(),
        chart.score
    );
    println!("  {}", chart.description);

    if let Some(insights) = &result.insights {
        println!();
        println!("{}", "Insights:".yellow().bold());
        for insight in insights {
            println!("  • {}", insight);
        }
    }

    if let Some(surprise) = &result.surprise {
        println!();
        println!("{}", "Worth a look:".magenta().bold());
        println!("  {} - {}", surprise.candidate.title.white(), surprise.insight);
    }

    let groups = result.grouped_alternatives();
    println!();
    println!("{}", "Sections:".yellow().bold());
    for group in &groups {
        println!(
            "  {:30} {} charts (best {:.3})",
            group.name.cyan(),
            group.charts.len(),
            group.score
        );
        if verbose {
            for alt in &group.charts {
                println!("      {:.3}  {}", alt.score, alt.title);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/sales.csv")),
            PathBuf::from("/data/sales.analysis.json")
        );
        assert_eq!(
            default_output_path(Path::new("survey")),
            PathBuf::from("survey.analysis.json")
        );
    }
}
