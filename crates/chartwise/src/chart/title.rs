//! Human-readable chart titles and descriptions.

use crate::schema::{Aggregate, ChartType, DatasetProfile};

use super::candidate::ChartPlan;

/// Longest title emitted, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Phrases longer than this many words are sentence-cased instead of title-cased.
const SENTENCE_WORDS: usize = 5;

/// Turn a column identifier into a phrase: `total_revenue` and
/// `totalRevenue` both become `Total Revenue`. Acronyms are kept.
pub fn humanize(name: &str) -> String {
    let words = split_words(name);
    if words.is_empty() {
        return name.trim().to_string();
    }
    let sentence = words.len() > SENTENCE_WORDS;
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if (sentence && i > 0) || word.chars().any(|c| c.is_uppercase()) {
                word.clone()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in name.split(|c: char| c == '_' || c.is_whitespace()) {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in chunk.chars() {
            // camelCase boundary
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cut a title to [`MAX_TITLE_CHARS`], ending in `...` when shortened.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let kept: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    format!("{}...", kept.trim_end())
}

/// Display label for a column: its humanized header text.
pub fn label(name: &str, profile: &DatasetProfile) -> String {
    let header = profile.column(name).map_or(name, |c| c.original_name.as_str());
    humanize(header)
}

/// Survey headers are often full questions; keep those as written.
fn is_question(text: &str) -> bool {
    text.contains('?') || text.split_whitespace().count() > SENTENCE_WORDS
}

fn question_label(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if is_question(&collapsed) {
        collapsed
    } else {
        humanize(&collapsed)
    }
}

/// Generate a phrase-shaped title for a plan.
pub fn generate_title(plan: &ChartPlan, profile: &DatasetProfile) -> String {
    let x = label(&plan.x_column, profile);
    let y = plan.y_column.as_deref().map(|name| label(name, profile));
    let color = plan.color_column.as_deref().map(|name| label(name, profile));
    let header = profile
        .column(&plan.x_column)
        .map_or(plan.x_column.as_str(), |c| c.original_name.as_str());

    let title = match (plan.chart_type, y, color) {
        (ChartType::Line, Some(y), _) => format!("{y} Over Time"),
        (ChartType::Line, None, _) => "Responses Over Time".to_string(),
        (ChartType::Bar, _, Some(color)) => format!("{x} by {color}"),
        (ChartType::Bar, Some(y), None) => match plan.aggregate {
            Some(Aggregate::Sum) => format!("Total {y} by {x}"),
            Some(Aggregate::Mean) => format!("Average {y} by {x}"),
            _ => format!("{y} by {x}"),
        },
        (ChartType::Bar, None, None) => format!("Count by {x}"),
        (ChartType::Scatter, Some(y), _) => format!("How {y} Relates to {x}"),
        (ChartType::Scatter, None, _) | (ChartType::Histogram, _, _) => {
            format!("Distribution of {x}")
        }
        (ChartType::LikertBar, _, _) => {
            if is_question(header) {
                question_label(header)
            } else {
                format!("{x} Responses")
            }
        }
        (ChartType::CheckboxBar, _, _) => {
            if is_question(header) {
                question_label(header)
            } else {
                format!("Most Selected {x}")
            }
        }
        (ChartType::GridBar, _, _) => {
            let stem = profile
                .column(&plan.x_column)
                .and_then(|c| c.grid_group.as_deref())
                .unwrap_or(header);
            if is_question(stem) {
                question_label(stem)
            } else {
                format!("{} Across Items", question_label(stem))
            }
        }
        (ChartType::Table, _, _) => "Data Overview".to_string(),
    };
    truncate_title(&title)
}

/// One-sentence rationale for a plan.
pub fn describe(plan: &ChartPlan, profile: &DatasetProfile) -> String {
    let x = label(&plan.x_column, profile).to_lowercase();
    let y = plan
        .y_column
        .as_deref()
        .map(|name| label(name, profile).to_lowercase())
        .unwrap_or_default();

    match plan.chart_type {
        ChartType::Line if plan.y_column.is_some() => match plan.aggregate {
            Some(Aggregate::Sum) => format!("Total {y} per {x}, showing the trend over time."),
            _ => format!("Shows how {y} changes over {x}."),
        },
        ChartType::Line => format!("Number of records per {x}."),
        ChartType::Bar => match (&plan.color_column, plan.aggregate, plan.y_column.is_some()) {
            (Some(color), _, _) => format!(
                "Breakdown of {x} by {}.",
                label(color, profile).to_lowercase()
            ),
            (None, Some(Aggregate::Sum), true) => format!("Sum of {y} for each {x}."),
            (None, Some(Aggregate::Mean), true) => format!("Average {y} for each {x}."),
            (None, _, true) => format!("Compares {y} across {x}."),
            (None, _, false) => format!("How many records fall in each {x}."),
        },
        ChartType::Scatter => format!("Relationship between {x} and {y}."),
        ChartType::Histogram => format!("Frequency distribution of {x}."),
        ChartType::LikertBar => {
            let order = profile
                .column(&plan.x_column)
                .map(|c| c.likert_order.as_slice())
                .unwrap_or_default();
            match (order.first(), order.last()) {
                (Some(first), Some(last)) => {
                    format!("Responses to {x}, ordered from {first} to {last}.")
                }
                _ => format!("Responses to {x}."),
            }
        }
        ChartType::CheckboxBar => format!("How often each option of {x} was selected."),
        ChartType::GridBar => {
            let stem = profile
                .column(&plan.x_column)
                .and_then(|c| c.grid_group.clone())
                .unwrap_or_else(|| x.clone());
            format!(
                "Responses across {} items of {stem}.",
                plan.group_columns.len()
            )
        }
        ChartType::Table => format!("All {} columns with their exact values.", plan.group_columns.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnProfile, Dtype};

    fn profile(names: &[(&str, Dtype)]) -> DatasetProfile {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, (name, dtype))| {
                let mut c = ColumnProfile::new(*name, *name, i);
                c.dtype = *dtype;
                c
            })
            .collect();
        DatasetProfile::new(3, columns)
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("revenue"), "Revenue");
        assert_eq!(humanize("total_revenue"), "Total Revenue");
        assert_eq!(humanize("orderDate"), "Order Date");
        assert_eq!(humanize("NPS score"), "NPS Score");
        assert_eq!(humanize("  spaced   out "), "Spaced Out");
        assert_eq!(
            humanize("how likely are you to recommend us"),
            "How likely are you to recommend us"
        );
    }

    #[test]
    fn test_truncate_title() {
        let long = "a".repeat(80);
        let cut = truncate_title(&long);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_title("Short"), "Short");
    }

    #[test]
    fn test_line_title() {
        let p = profile(&[("date", Dtype::Temporal), ("revenue", Dtype::Numeric)]);
        let plan = ChartPlan::new(ChartType::Line, "date").with_y("revenue");
        let title = generate_title(&plan, &p);
        assert_eq!(title, "Revenue Over Time");
    }

    #[test]
    fn test_titles_are_phrases() {
        let p = profile(&[("region", Dtype::Nominal), ("units_sold", Dtype::Numeric)]);
        let sum = ChartPlan::new(ChartType::Bar, "region")
            .with_y("units_sold")
            .with_aggregate(Aggregate::Sum);
        assert_eq!(generate_title(&sum, &p), "Total Units Sold by Region");
        let count = ChartPlan::new(ChartType::Bar, "region");
        assert_eq!(generate_title(&count, &p), "Count by Region");
        let hist = ChartPlan::new(ChartType::Histogram, "units_sold");
        assert_eq!(generate_title(&hist, &p), "Distribution of Units Sold");
        assert_eq!(
            describe(&sum, &p),
            "Sum of units sold for each region."
        );
    }

    #[test]
    fn test_question_title_kept() {
        let p = profile(&[("How satisfied are you with us?", Dtype::Ordinal)]);
        let plan = ChartPlan::new(ChartType::LikertBar, "How satisfied are you with us?");
        assert_eq!(generate_title(&plan, &p), "How satisfied are you with us?");
    }
}
