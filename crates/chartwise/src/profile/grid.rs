//! Grid-question detection across completed column profiles.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{ColumnProfile, Dtype};

/// Header shapes that split a grid question into stem and sub-item.
static GRID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "How satisfied are you [Price]"
        Regex::new(r"^(?P<stem>.+?)\s*\[(?P<item>[^\]]+)\]\s*$").unwrap(),
        // "Satisfaction: Price", "Satisfaction - Price", "Satisfaction | Price"
        Regex::new(r"^(?P<stem>.+?)\s*(?::|\s-\s|\s\|\s|\s–\s)\s*(?P<item>\S.*)$").unwrap(),
        // "Satisfaction (Price)"
        Regex::new(r"^(?P<stem>.+?)\s*\((?P<item>[^)]+)\)\s*$").unwrap(),
    ]
});

/// Split a raw header into (stem, item) if it has a grid shape.
pub fn split_grid_header(header: &str) -> Option<(String, String)> {
    let collapsed = header.split_whitespace().collect::<Vec<_>>().join(" ");
    GRID_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(&collapsed)?;
        let stem = caps.name("stem")?.as_str().trim();
        let item = caps.name("item")?.as_str().trim();
        (!stem.is_empty() && !item.is_empty()).then(|| (stem.to_string(), item.to_string()))
    })
}

/// Annotate columns that share a stem and dtype with `grid_group`.
///
/// Runs after every column has been profiled and reads them without
/// mutation; annotated copies are returned. Groups of one are discarded.
/// When a stem spans several dtypes, the largest dtype subset keeps the
/// group (ties go to the subset seen first).
pub fn assign_grid_groups(columns: Vec<ColumnProfile>) -> Vec<ColumnProfile> {
    let mut by_stem: IndexMap<String, IndexMap<Dtype, Vec<(usize, String)>>> = IndexMap::new();
    for (idx, column) in columns.iter().enumerate() {
        if let Some((stem, item)) = split_grid_header(&column.original_name) {
            by_stem
                .entry(stem)
                .or_default()
                .entry(column.dtype)
                .or_default()
                .push((idx, item));
        }
    }

    let mut assignments: Vec<Option<(String, String)>> = vec![None; columns.len()];
    for (stem, subsets) in by_stem {
        let mut best: Option<Vec<(usize, String)>> = None;
        for (_, members) in subsets {
            if best.as_ref().is_none_or(|b| members.len() > b.len()) {
                best = Some(members);
            }
        }
        let Some(members) = best else { continue };
        if members.len() < 2 {
            continue;
        }
        for (idx, item) in members {
            assignments[idx] = Some((stem.clone(), item));
        }
    }

    columns
        .into_iter()
        .zip(assignments)
        .map(|(column, assignment)| match assignment {
            Some((stem, item)) => ColumnProfile {
                grid_group: Some(stem),
                grid_item: Some(item),
                ..column
            },
            None => column,
        })
        .collect()
}
