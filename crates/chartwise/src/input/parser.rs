//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ChartwiseError, Result};
use super::source::{DataTable, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Spreadsheet extensions that must be converted to a delimited format first.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    /// Check that the delimiter and quote characters are usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(d) = self.delimiter {
            if !d.is_ascii() || d == self.quote || d == b'\n' || d == b'\r' {
                return Err(ChartwiseError::InvalidDelimiter(format!(
                    "{:?} cannot be used as a delimiter",
                    d as char
                )));
            }
        }
        Ok(())
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        self.config.validate()?;

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ChartwiseError::UnsupportedFormat(format!(
                "'.{}' spreadsheets must be exported to CSV before analysis",
                extension
            )));
        }

        let mut file = File::open(path).map_err(|e| ChartwiseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| ChartwiseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(strip_bom(&contents))?,
        };

        let data_table = self.parse_with_delimiter(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse in-memory bytes, detecting the delimiter unless configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        self.config.validate()?;
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(strip_bom(bytes))?,
        };
        self.parse_with_delimiter(bytes, delimiter)
    }

    fn parse_with_delimiter(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(strip_bom(bytes));

        let header_row: Option<Vec<String>> = if self.config.has_header {
            Some(reader.headers()?.iter().map(|s| s.to_string()).collect())
        } else {
            None
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        // Without a header row, names come from the first record's width
        let headers = header_row.unwrap_or_else(|| {
            let width = rows.first().map(|r| r.len()).unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        });

        if headers.is_empty() {
            return Err(ChartwiseError::InsufficientData(
                "No columns found".to_string(),
            ));
        }

        Ok(DataTable::from_text_rows(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ChartwiseError::InsufficientData(
            "No lines to analyze".to_string(),
        ));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a slight bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CellValue;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_quoted_commas_do_not_confuse_detection() {
        let data = b"device;note\n\"Mobile, Desktop\";a\n\"Tablet\";b";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&CellValue::from("Alice")));
        assert_eq!(table.get(1, 1), Some(&CellValue::from("25")));
    }

    #[test]
    fn test_parse_strips_bom_and_keeps_quoted_tokens() {
        let parser = Parser::new();
        let data = "\u{feff}device,count\n\"Mobile, Desktop\",3\n".as_bytes();
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers[0], "device");
        assert_eq!(table.get(0, 0), Some(&CellValue::from("Mobile, Desktop")));
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..Default::default()
        });
        let table = parser.parse_bytes(b"1,2\n3,4").unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let table = parser.parse_bytes(b"a,b\n1,2\n3,4\n5,6").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"   \n"),
            Err(ChartwiseError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_rejects_spreadsheets() {
        let parser = Parser::new();
        let result = parser.parse_file("survey.xlsx");
        assert!(matches!(result, Err(ChartwiseError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_delimiter() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b'"'),
            ..Default::default()
        });
        assert!(matches!(
            parser.parse_bytes(b"a,b\n1,2"),
            Err(ChartwiseError::InvalidDelimiter(_))
        ));
    }
}
