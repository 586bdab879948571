//! Column profile definition.

use serde::{Deserialize, Serialize};

use super::types::Dtype;

/// Earliest and latest timestamps of a temporal column, ISO-8601 formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalRange {
    pub start: String,
    pub end: String,
}

/// Profile of one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Sanitized identifier, unique within the dataset.
    pub name: String,
    /// Raw header text.
    pub original_name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Inferred semantic type.
    pub dtype: Dtype,
    /// Total number of values (including nulls).
    pub count: usize,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// First few non-null raw values, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    /// Covered time span (temporal columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_range: Option<TemporalRange>,
    /// Delimiter-joined multi-select answers.
    #[serde(default)]
    pub is_checkbox: bool,
    /// Token vocabulary of a checkbox column, most frequent first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checkbox_options: Vec<String>,
    /// Values form a known rating scale.
    #[serde(default)]
    pub is_likert: bool,
    /// Observed scale levels, most positive first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub likert_order: Vec<String>,
    /// Name of the matched rating scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likert_scale: Option<String>,
    /// Shared stem of a multi-part survey question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_group: Option<String>,
    /// This column's sub-item label within its grid group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_item: Option<String>,
    /// Row identifier (unique values under an id-like name).
    #[serde(default)]
    pub is_identifier: bool,
}

impl ColumnProfile {
    /// Create an empty nominal profile for a column.
    pub fn new(name: impl Into<String>, original_name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            original_name: original_name.into(),
            position,
            dtype: Dtype::Nominal,
            count: 0,
            null_count: 0,
            unique_count: 0,
            examples: Vec::new(),
            min: None,
            max: None,
            mean: None,
            std: None,
            median: None,
            temporal_range: None,
            is_checkbox: false,
            checkbox_options: Vec::new(),
            is_likert: false,
            likert_order: Vec::new(),
            likert_scale: None,
            grid_group: None,
            grid_item: None,
            is_identifier: false,
        }
    }

    /// Number of non-null values.
    pub fn non_null_count(&self) -> usize {
        self.count - self.null_count
    }

    /// Fraction of values that are null (0.0-1.0).
    pub fn null_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.count as f64
        }
    }

    /// A column with at most one distinct value carries no comparative signal.
    pub fn is_constant(&self) -> bool {
        self.unique_count <= 1
    }

    /// Whether the column can be placed on a chart axis next to another column.
    pub fn is_pairable(&self) -> bool {
        !self.is_constant() && !self.is_identifier
    }

    /// Plain categorical column: not a checkbox field.
    pub fn is_plain_categorical(&self) -> bool {
        self.dtype.is_categorical() && !self.is_checkbox
    }

    /// Label used in titles and sentences.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}
