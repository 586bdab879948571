//! Parsing of raw cell text into numbers and timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::CellValue;

/// Thousands-grouped integer part, e.g. `1,234,567`.
static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

/// Year-month values such as `2024-03`.
static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{1,2}$").unwrap());

/// A standalone four-digit run; chrono's `%Y` also accepts one to three digits.
static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|\D)\d{4}(\D|$)").unwrap());

/// Datetime formats tried after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats; month-first is preferred over day-first for slashes.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Parse a cell as a number.
///
/// Booleans and temporal-looking text are not numbers.
pub fn cell_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_number(s),
        _ => None,
    }
}

/// Parse text as a number, tolerating currency symbols, thousands
/// separators and a trailing percent sign.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut cleaned: String = trimmed
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .collect();
    cleaned = cleaned.trim().to_string();
    if let Some(stripped) = cleaned.strip_suffix('%') {
        cleaned = stripped.trim_end().to_string();
    }
    if cleaned.contains(',') {
        if !GROUPED_NUMBER.is_match(&cleaned) {
            return None;
        }
        cleaned.retain(|c| c != ',');
    }
    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    // Rust accepts "inf"/"nan" spellings; those are text here.
    if cleaned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a cell as a timestamp. Numeric cells are never temporal.
pub fn cell_temporal(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Text(s) => parse_temporal(s),
        _ => None,
    }
}

/// Parse text as a date or datetime under the supported formats.
pub fn parse_temporal(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    // Bare digit runs are years, codes or measurements, not dates.
    if trimmed.len() < 6 || trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Version strings like `10.5.3` would otherwise read as year 3.
    if !FOUR_DIGIT_YEAR.is_match(trimmed) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    if YEAR_MONTH.is_match(trimmed) {
        let first_day = format!("{trimmed}-01");
        if let Ok(date) = NaiveDate::parse_from_str(&first_day, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// ISO-8601 rendering: date only at midnight, full datetime otherwise.
pub fn format_iso(dt: &NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn test_parse_number_symbols() {
        assert_eq!(parse_number("$1,200"), Some(1200.0));
        assert_eq!(parse_number("€50.00"), Some(50.0));
        assert_eq!(parse_number("45%"), Some(45.0));
        assert_eq!(parse_number("1,234,567.5"), Some(1_234_567.5));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1,2"), None);
        assert_eq!(parse_number("Mobile, Desktop"), None);
        assert_eq!(parse_number("$"), None);
    }

    #[test]
    fn test_cell_number() {
        assert_eq!(cell_number(&CellValue::Number(2.5)), Some(2.5));
        assert_eq!(cell_number(&CellValue::Bool(true)), None);
        assert_eq!(cell_number(&CellValue::from("7")), Some(7.0));
    }

    #[test]
    fn test_parse_temporal_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for text in [
            "2024-01-15",
            "2024/01/15",
            "01/15/2024",
            "15/01/2024",
            "15.01.2024",
            "Jan 15, 2024",
            "15 January 2024",
        ] {
            assert_eq!(parse_temporal(text), Some(expected), "format: {text}");
        }
        assert!(parse_temporal("2024-01-15T10:30:00Z").is_some());
        assert!(parse_temporal("2024-01-15 10:30:00").is_some());
        assert!(parse_temporal("2024-03").is_some());
    }

    #[test]
    fn test_parse_temporal_rejects() {
        assert!(parse_temporal("2024").is_none());
        assert!(parse_temporal("20240115").is_none());
        assert!(parse_temporal("hello world").is_none());
        assert!(parse_temporal("13/45/2024").is_none());
        assert!(parse_temporal("10.5.3").is_none());
        assert!(parse_temporal("1/2/3").is_none());
        assert!(parse_temporal("12.1.0").is_none());
        assert!(parse_temporal("5 Jan 24").is_none());
        assert!(cell_temporal(&CellValue::Number(20240115.0)).is_none());
    }

    #[test]
    fn test_format_iso() {
        let date = parse_temporal("2024-01-15").unwrap();
        assert_eq!(format_iso(&date), "2024-01-15");
        let dt = parse_temporal("2024-01-15 10:30:00").unwrap();
        assert_eq!(format_iso(&dt), "2024-01-15T10:30:00");
    }
}
