//! Dataset-level profile.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::ColumnProfile;

/// Grid groups keyed by stem, each listing member column positions in source order.
pub type GridIndex = IndexMap<String, Vec<usize>>;

/// Profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub col_count: usize,
    /// One profile per source column, in source order.
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn new(row_count: usize, columns: Vec<ColumnProfile>) -> Self {
        Self {
            row_count,
            col_count: columns.len(),
            columns,
        }
    }

    /// Get a column profile by sanitized name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Sanitized column names in source order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Build the stem to member index from per-column grid annotations.
    pub fn grid_index(&self) -> GridIndex {
        let mut index = GridIndex::new();
        for column in &self.columns {
            if let Some(stem) = &column.grid_group {
                index.entry(stem.clone()).or_default().push(column.position);
            }
        }
        index
    }

    /// Whether any column belongs to a detected survey structure.
    pub fn has_survey_structure(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.is_likert || c.is_checkbox || c.grid_group.is_some())
    }
}
