//! Data source abstraction and metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Detected encoding.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
}

impl SourceMetadata {
    /// Create metadata for a file that has been parsed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| sanitize_filename(&s.to_string_lossy()))
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
        }
    }
}

/// A single raw cell as handed over by a file parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Whether the cell is absent or holds a textual null marker.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
            CellValue::Text(s) => DataTable::is_null_value(s),
        }
    }

    /// Canonical text form used for distinct-value counting and display.
    ///
    /// Returns `None` for null cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_plain_number(*n)),
            CellValue::Text(s) => Some(s.trim().to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One output record: sanitized column name to raw value, in column order.
pub type Record = IndexMap<String, CellValue>;

/// Represents parsed tabular data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Sanitized, unique column names.
    pub headers: Vec<String>,
    /// Raw header text as found in the source.
    pub original_headers: Vec<String>,
    /// Row data (row-major order), each row padded to the header width.
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Create a new data table from raw headers and cells.
    ///
    /// Headers are sanitized and disambiguated; ragged rows are padded with
    /// nulls or truncated to the header width.
    pub fn new(raw_headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = sanitize_headers(&raw_headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        Self {
            headers,
            original_headers: raw_headers,
            rows,
        }
    }

    /// Create a table where every cell is raw text.
    pub fn from_text_rows(raw_headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::Text).collect())
            .collect();
        Self::new(raw_headers, rows)
    }

    /// Create a table from row-oriented records keyed by the raw header text.
    ///
    /// Keys missing from a record become nulls; keys not listed in
    /// `raw_headers` are ignored.
    pub fn from_records(raw_headers: Vec<String>, records: Vec<Record>) -> Self {
        let rows = records
            .into_iter()
            .map(|mut record| {
                raw_headers
                    .iter()
                    .map(|h| record.shift_remove(h).unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();
        Self::new(raw_headers, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&CellValue::Null))
    }

    /// Position of a column by its sanitized name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Rebuild the table without rows and columns that hold only nulls.
    pub fn without_empty_rows_and_columns(&self) -> Self {
        let keep_cols: Vec<usize> = (0..self.column_count())
            .filter(|&idx| self.column_values(idx).any(|v| !v.is_null()))
            .collect();

        let rows = self
            .rows
            .iter()
            .filter(|row| keep_cols.iter().any(|&idx| !row[idx].is_null()))
            .map(|row| keep_cols.iter().map(|&idx| row[idx].clone()).collect())
            .collect();

        Self {
            headers: keep_cols.iter().map(|&idx| self.headers[idx].clone()).collect(),
            original_headers: keep_cols
                .iter()
                .map(|&idx| self.original_headers[idx].clone())
                .collect(),
            rows,
        }
    }

    /// Row-oriented view keyed by sanitized column names.
    pub fn to_records(&self, limit: usize) -> Vec<Record> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

/// Turn raw header text into unique, single-line column identifiers.
fn sanitize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(idx, header)| {
            let collapsed = header.split_whitespace().collect::<Vec<_>>().join(" ");
            let base = if collapsed.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                collapsed
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while used.contains(&name) {
                suffix += 1;
                name = format!("{} ({})", base, suffix);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Strip path components and control characters from a user-supplied file name.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == ' ');
    let truncated: String = trimmed.chars().take(255).collect();

    if truncated.is_empty() {
        "unknown".to_string()
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::from_text_rows(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_sanitize_headers() {
        let table = text_table(vec!["Revenue\n(USD)", "", "Revenue\n(USD)"], vec![]);
        assert_eq!(table.headers, vec!["Revenue (USD)", "column_2", "Revenue (USD) (2)"]);
        assert_eq!(table.original_headers[0], "Revenue\n(USD)");
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = text_table(vec!["a", "b", "c"], vec![vec!["1"], vec!["1", "2", "3", "4"]]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1].len(), 3);
        assert!(table.rows[0][2].is_null());
    }

    #[test]
    fn test_from_records() {
        let mut record = Record::new();
        record.insert("score".to_string(), CellValue::Number(4.0));
        record.insert("name".to_string(), CellValue::from("Ann"));
        let table = DataTable::from_records(
            vec!["name".to_string(), "score".to_string(), "extra".to_string()],
            vec![record],
        );

        assert_eq!(table.get(0, 0), Some(&CellValue::from("Ann")));
        assert_eq!(table.get(0, 1), Some(&CellValue::Number(4.0)));
        assert_eq!(table.get(0, 2), Some(&CellValue::Null));
    }

    #[test]
    fn test_drop_empty_rows_and_columns() {
        let table = text_table(
            vec!["a", "empty", "b"],
            vec![vec!["1", "", "x"], vec!["", "NA", ""], vec!["3", "", "z"]],
        );
        let cleaned = table.without_empty_rows_and_columns();
        assert_eq!(cleaned.headers, vec!["a", "b"]);
        assert_eq!(cleaned.row_count(), 2);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(CellValue::Number(1000.0).as_text().as_deref(), Some("1000"));
        assert_eq!(CellValue::Number(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::from(" Agree ").as_text().as_deref(), Some("Agree"));
        assert_eq!(CellValue::from("N/A").as_text(), None);
        assert_eq!(CellValue::Bool(true).as_text().as_deref(), Some("true"));
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("n/a"));
        assert!(DataTable::is_null_value("null"));
        assert!(DataTable::is_null_value("."));
        assert!(!DataTable::is_null_value("value"));
        assert!(!DataTable::is_null_value("0"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\data\\sales.csv"), "sales.csv");
        assert_eq!(sanitize_filename("bad\nname.csv"), "badname.csv");
        assert_eq!(sanitize_filename("..."), "unknown");
    }
}
