//! Integration tests for Chartwise.

use std::io::Write;
use tempfile::NamedTempFile;

use chartwise::{CellValue, ChartType, Chartwise, ChartwiseError, DataTable, Dtype, Record};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn make_table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
    DataTable::from_text_rows(
        headers.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn test_time_series_recommends_line() {
    let table = make_table(
        &["date", "revenue"],
        &[&["2024-01-01", "1000"], &["2024-01-02", "1200"], &["2024-01-03", "1100"]],
    );
    let result = Chartwise::new()
        .analyze_table("revenue.csv", &table)
        .expect("Analysis failed");

    let chart = &result.recommended_chart;
    assert_eq!(chart.chart_type, ChartType::Line);
    assert_eq!(chart.x_column, "date");
    assert_eq!(chart.y_column.as_deref(), Some("revenue"));
    assert!(chart.title.contains("Revenue"));
    assert!(chart.title.contains("Time"));
    assert_eq!(chart.spec["mark"]["type"], "line");
}

#[test]
fn test_categories_recommend_bar() {
    let table = make_table(
        &["category", "value"],
        &[&["A", "10"], &["A", "12"], &["B", "5"], &["B", "6"], &["B", "4"]],
    );
    let result = Chartwise::new()
        .analyze_table("values.csv", &table)
        .expect("Analysis failed");

    let chart = &result.recommended_chart;
    assert_eq!(chart.chart_type, ChartType::Bar);
    assert_eq!(chart.x_column, "category");
    assert_eq!(chart.y_column.as_deref(), Some("value"));
}

#[test]
fn test_satisfaction_column_is_likert() {
    let table = make_table(
        &["How satisfied are you?"],
        &[&["Satisfied"], &["Very Satisfied"], &["Neutral"], &["Dissatisfied"]],
    );
    let result = Chartwise::new()
        .analyze_table("survey.csv", &table)
        .expect("Analysis failed");

    let column = &result.profile.columns[0];
    assert_eq!(column.dtype, Dtype::Ordinal);
    assert!(column.is_likert);
    assert_eq!(column.likert_order.first().map(String::as_str), Some("Very Satisfied"));
    assert_eq!(column.likert_order.last().map(String::as_str), Some("Dissatisfied"));
    assert_eq!(result.recommended_chart.chart_type, ChartType::LikertBar);
}

#[test]
fn test_multi_select_column_is_checkbox() {
    let table = make_table(
        &["Devices used"],
        &[&["Mobile, Desktop"], &["Desktop"], &["Mobile, Tablet"]],
    );
    let result = Chartwise::new()
        .analyze_table("devices.csv", &table)
        .expect("Analysis failed");

    let column = &result.profile.columns[0];
    assert!(column.is_checkbox);
    assert_eq!(column.dtype, Dtype::Nominal);

    let mut options = column.checkbox_options.clone();
    options.sort();
    assert_eq!(options, vec!["Desktop", "Mobile", "Tablet"]);

    let checkbox = result
        .alternatives
        .iter()
        .find(|c| c.chart_type == ChartType::CheckboxBar)
        .expect("No checkbox candidate");
    assert_eq!(checkbox.x_column, "Devices used");
}

#[test]
fn test_single_cell_recommends_table() {
    let table = make_table(&["x"], &[&["1"]]);
    let result = Chartwise::new()
        .analyze_table("one.csv", &table)
        .expect("Analysis failed");

    assert_eq!(result.recommended_chart.chart_type, ChartType::Table);
    assert!(result.alternatives.iter().all(|c| c.y_column.is_none()));
    assert!(result.alternatives.iter().all(|c| c.color_column.is_none()));
    assert_eq!(
        result.insights,
        Some(vec!["The dataset has 1 row and 1 column.".to_string()])
    );
}

#[test]
fn test_version_strings_are_not_dates() {
    let table = make_table(
        &["version", "n"],
        &[&["10.5.3", "1"], &["11.6.4", "2"], &["12.1.0", "3"]],
    );
    let result = Chartwise::new()
        .analyze_table("versions.csv", &table)
        .expect("Analysis failed");

    assert_eq!(result.profile.column("version").unwrap().dtype, Dtype::Nominal);
    assert!(result.alternatives.iter().all(|c| c.chart_type != ChartType::Line));
}

#[test]
fn test_city_state_values_are_single_select() {
    let table = make_table(
        &["city", "orders"],
        &[
            &["Austin, TX", "12"],
            &["Dallas, TX", "8"],
            &["Austin, TX", "15"],
            &["Houston, TX", "9"],
        ],
    );
    let result = Chartwise::new()
        .analyze_table("cities.csv", &table)
        .expect("Analysis failed");

    assert!(!result.profile.column("city").unwrap().is_checkbox);
    assert!(result.alternatives.iter().all(|c| c.chart_type != ChartType::CheckboxBar));
    assert_eq!(result.recommended_chart.chart_type, ChartType::Bar);
}

// =============================================================================
// Survey Structures
// =============================================================================

#[test]
fn test_grid_question_recommended() {
    let table = make_table(
        &["Satisfaction: Price", "Satisfaction: Support", "Satisfaction: Speed"],
        &[
            &["Agree", "Strongly agree", "Disagree"],
            &["Neutral", "Agree", "Agree"],
            &["Strongly agree", "Agree", "Neutral"],
            &["Disagree", "Neutral", "Agree"],
        ],
    );
    let result = Chartwise::new()
        .analyze_table("grid.csv", &table)
        .expect("Analysis failed");

    for column in &result.profile.columns {
        assert_eq!(column.grid_group.as_deref(), Some("Satisfaction"));
        assert!(column.is_likert);
    }

    let chart = &result.recommended_chart;
    assert_eq!(chart.chart_type, ChartType::GridBar);
    assert_eq!(chart.group_columns.len(), 3);
    assert!(result.insights.as_ref().is_some_and(|i| !i.is_empty()));
}

#[test]
fn test_lone_grid_stem_not_grouped() {
    let table = make_table(
        &["Rating: Overall", "comments"],
        &[&["Agree", "fine"], &["Disagree", "slow"], &["Neutral", "ok"]],
    );
    let result = Chartwise::new()
        .analyze_table("lone.csv", &table)
        .expect("Analysis failed");

    assert!(result.profile.columns.iter().all(|c| c.grid_group.is_none()));
}

// =============================================================================
// File Input
// =============================================================================

#[test]
fn test_analyze_csv_file() {
    let content = "date,region,sales\n\
                   2024-01-01,North,100\n\
                   2024-01-02,South,140\n\
                   2024-01-03,North,90\n\
                   2024-01-04,South,200\n";
    let file = create_test_file(content);

    let result = Chartwise::new().analyze(file.path()).expect("Analysis failed");

    let source = result.source.as_ref().expect("No source metadata");
    assert_eq!(source.format, "csv");
    assert_eq!(source.row_count, 4);
    assert_eq!(source.column_count, 3);
    assert!(source.hash.starts_with("sha256:"));

    assert_eq!(result.profile.col_count, 3);
    assert_eq!(result.dataset.len(), 4);
    assert_eq!(result.recommended_chart.chart_type, ChartType::Line);
    assert_eq!(result.alternatives[0], result.recommended_chart);
}

#[test]
fn test_analyze_tsv_file() {
    let content = "team\tscore\nred\t10\nblue\t15\ngreen\t7\n";
    let file = create_test_file(content);

    let result = Chartwise::new().analyze(file.path()).expect("Analysis failed");
    assert_eq!(result.source.as_ref().map(|s| s.format.as_str()), Some("tsv"));
    assert_eq!(result.recommended_chart.chart_type, ChartType::Bar);
}

#[test]
fn test_empty_file_is_insufficient() {
    let file = create_test_file("a,b\n,\n,\n");
    let err = Chartwise::new().analyze(file.path()).unwrap_err();
    assert!(matches!(err, ChartwiseError::InsufficientData(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Chartwise::new()
        .analyze("/nonexistent/data.csv")
        .unwrap_err();
    assert!(matches!(err, ChartwiseError::Io { .. }));
}

#[test]
fn test_spreadsheet_rejected() {
    let err = Chartwise::new().analyze("report.xlsx").unwrap_err();
    assert!(matches!(err, ChartwiseError::UnsupportedFormat(_)));
}

// =============================================================================
// Records and Output Shape
// =============================================================================

#[test]
fn test_analyze_records() {
    let headers = vec!["product".to_string(), "units".to_string(), "in_stock".to_string()];
    let records: Vec<Record> = [("apple", 30.0, true), ("pear", 12.0, false), ("fig", 5.0, true)]
        .into_iter()
        .map(|(p, u, s)| {
            let mut record = Record::new();
            record.insert("product".into(), CellValue::from(p));
            record.insert("units".into(), CellValue::from(u));
            record.insert("in_stock".into(), CellValue::from(s));
            record
        })
        .collect();

    let result = Chartwise::new()
        .analyze_records("fruit", headers, records)
        .expect("Analysis failed");

    assert_eq!(result.profile.row_count, 3);
    assert_eq!(result.profile.columns[1].dtype, Dtype::Numeric);
    assert_eq!(result.dataset[0]["units"], CellValue::Number(30.0));
}

#[test]
fn test_candidate_columns_exist() {
    let table = make_table(
        &["date", "region", "channel", "sales", "cost"],
        &[
            &["2024-01-01", "North", "web", "100", "40"],
            &["2024-01-02", "South", "store", "140", "70"],
            &["2024-01-03", "North", "store", "90", "35"],
            &["2024-01-04", "East", "web", "200", "120"],
            &["2024-01-05", "South", "web", "160", "80"],
        ],
    );
    let result = Chartwise::new()
        .analyze_table("sales.csv", &table)
        .expect("Analysis failed");

    for chart in &result.alternatives {
        assert!(result.profile.column(&chart.x_column).is_some());
        for name in chart.y_column.iter().chain(chart.color_column.iter()) {
            assert!(result.profile.column(name).is_some(), "missing column {name}");
        }
    }
    let best = result
        .alternatives
        .iter()
        .map(|c| c.score)
        .fold(f64::MIN, f64::max);
    assert_eq!(result.recommended_chart.score, best);
}

#[test]
fn test_analysis_is_idempotent() {
    let table = make_table(
        &["date", "region", "sales"],
        &[
            &["2024-01-01", "North", "100"],
            &["2024-01-02", "South", "140"],
            &["2024-01-03", "North", "90"],
            &["2024-01-04", "South", "210"],
        ],
    );
    let engine = Chartwise::new();
    let first = engine.analyze_table("s.csv", &table).expect("Analysis failed");
    let second = engine.analyze_table("s.csv", &table).expect("Analysis failed");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_result_json_shape() {
    let table = make_table(
        &["category", "value"],
        &[&["A", "10"], &["A", "12"], &["B", "5"]],
    );
    let result = Chartwise::new()
        .analyze_table("shape.csv", &table)
        .expect("Analysis failed");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["filename"], "shape.csv");
    assert!(json["recommended_chart"]["spec"]["$schema"]
        .as_str()
        .unwrap()
        .contains("vega-lite"));
    assert_eq!(json["profile"]["columns"][0]["dtype"], "nominal");
    assert!(json.get("source").is_none());
}
