//! Chart data extraction from the source table.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::input::{CellValue, DataTable};
use crate::profile::split_tokens;
use crate::profile::values::{cell_number, cell_temporal};
use crate::schema::Aggregate;

fn column<'a>(table: &'a DataTable, name: &str) -> impl Iterator<Item = &'a CellValue> + use<'a> {
    let index = table.column_index(name);
    table
        .rows
        .iter()
        .filter_map(move |row| index.and_then(|i| row.get(i)))
}

/// Parsed numbers of a column, nulls and unparseable cells skipped.
pub fn numbers(table: &DataTable, name: &str) -> Vec<f64> {
    column(table, name).filter_map(cell_number).collect()
}

/// Rows where both columns hold numbers.
pub fn number_pairs(table: &DataTable, x: &str, y: &str) -> Vec<(f64, f64)> {
    column(table, x)
        .zip(column(table, y))
        .filter_map(|(a, b)| Some((cell_number(a)?, cell_number(b)?)))
        .collect()
}

/// Value per timestamp, in time order.
///
/// `Count` counts rows per timestamp; `Mean` averages; anything else sums.
pub fn time_series(
    table: &DataTable,
    x: &str,
    y: Option<&str>,
    aggregate: Option<Aggregate>,
) -> Vec<(NaiveDateTime, f64)> {
    let mut buckets: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
    match y {
        Some(y) if aggregate != Some(Aggregate::Count) => {
            for (t, v) in column(table, x).zip(column(table, y)) {
                if let (Some(t), Some(v)) = (cell_temporal(t), cell_number(v)) {
                    let slot = buckets.entry(t).or_insert((0.0, 0));
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
        }
        _ => {
            for t in column(table, x).filter_map(cell_temporal) {
                let slot = buckets.entry(t).or_insert((0.0, 0));
                slot.0 += 1.0;
                slot.1 += 1;
            }
        }
    }
    buckets
        .into_iter()
        .map(|(t, (sum, n))| match aggregate {
            Some(Aggregate::Mean) if y.is_some() => (t, sum / n as f64),
            _ => (t, sum),
        })
        .collect()
}

/// Value per category, in first-seen order.
pub fn category_values(
    table: &DataTable,
    x: &str,
    y: Option<&str>,
    aggregate: Option<Aggregate>,
) -> IndexMap<String, f64> {
    let mut buckets: IndexMap<String, (f64, usize)> = IndexMap::new();
    match y {
        Some(y) if aggregate != Some(Aggregate::Count) => {
            for (c, v) in column(table, x).zip(column(table, y)) {
                if let (Some(c), Some(v)) = (c.as_text(), cell_number(v)) {
                    let slot = buckets.entry(c).or_insert((0.0, 0));
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
        }
        _ => {
            for c in column(table, x).filter_map(CellValue::as_text) {
                let slot = buckets.entry(c).or_insert((0.0, 0));
                slot.0 += 1.0;
                slot.1 += 1;
            }
        }
    }
    buckets
        .into_iter()
        .map(|(c, (sum, n))| match aggregate {
            Some(Aggregate::Mean) if y.is_some() => (c, sum / n as f64),
            _ => (c, sum),
        })
        .collect()
}

/// Distinct values with their counts, in first-seen order.
pub fn value_counts(table: &DataTable, name: &str) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for text in column(table, name).filter_map(CellValue::as_text) {
        *counts.entry(text).or_insert(0) += 1;
    }
    counts
}

/// Counts of (x, color) combinations, in first-seen order.
pub fn pair_counts(table: &DataTable, x: &str, color: &str) -> IndexMap<(String, String), usize> {
    let mut counts = IndexMap::new();
    for (a, b) in column(table, x).zip(column(table, color)) {
        if let (Some(a), Some(b)) = (a.as_text(), b.as_text()) {
            *counts.entry((a, b)).or_insert(0) += 1;
        }
    }
    counts
}

/// Checkbox token counts plus the number of answering rows.
pub fn token_counts(table: &DataTable, name: &str) -> (IndexMap<String, usize>, usize) {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut respondents = 0;
    for text in column(table, name).filter_map(CellValue::as_text) {
        respondents += 1;
        let mut seen: Vec<&str> = Vec::new();
        for token in split_tokens(&text) {
            if !seen.contains(&token) {
                seen.push(token);
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }
    }
    (counts, respondents)
}
