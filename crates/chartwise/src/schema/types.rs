//! Core type definitions for profiles and chart candidates.

use serde::{Deserialize, Serialize};

/// Semantic data type of a column.
///
/// Determined once per column by the detector chain and never changed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    /// Measurements and quantities.
    Numeric,
    /// Dates and timestamps.
    Temporal,
    /// Unordered categories and free text.
    #[default]
    Nominal,
    /// Ordered categories (detected rating scales).
    Ordinal,
}

impl Dtype {
    /// Returns true for nominal and ordinal columns.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Dtype::Nominal | Dtype::Ordinal)
    }

    /// Field type used in declarative chart encodings.
    pub fn encoding_type(&self) -> &'static str {
        match self {
            Dtype::Numeric => "quantitative",
            Dtype::Temporal => "temporal",
            Dtype::Nominal => "nominal",
            Dtype::Ordinal => "ordinal",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Dtype::Numeric => "Numeric",
            Dtype::Temporal => "Temporal",
            Dtype::Nominal => "Nominal",
            Dtype::Ordinal => "Ordinal",
        }
    }
}

/// The closed vocabulary of chart types the engine can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Trend over time.
    Line,
    /// Comparison across categories.
    Bar,
    /// Relationship between two measures.
    Scatter,
    /// Distribution of one measure.
    Histogram,
    /// Exact values, always available.
    Table,
    /// Ordered response breakdown for a rating scale column.
    LikertBar,
    /// Token counts for a multi-select column.
    CheckboxBar,
    /// Stacked responses across the sub-items of a grid question.
    GridBar,
}

impl ChartType {
    /// Tie-break rank among equal scores; lower wins.
    pub fn priority(&self) -> u8 {
        match self {
            ChartType::Line => 0,
            ChartType::Bar => 1,
            ChartType::Scatter => 2,
            ChartType::Histogram => 3,
            ChartType::LikertBar | ChartType::CheckboxBar | ChartType::GridBar => 4,
            ChartType::Table => 5,
        }
    }

    /// Whether this chart type exists only for detected survey structures.
    pub fn is_survey(&self) -> bool {
        matches!(
            self,
            ChartType::LikertBar | ChartType::CheckboxBar | ChartType::GridBar
        )
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Line => "Line",
            ChartType::Bar => "Bar",
            ChartType::Scatter => "Scatter",
            ChartType::Histogram => "Histogram",
            ChartType::Table => "Table",
            ChartType::LikertBar => "Likert Bar",
            ChartType::CheckboxBar => "Checkbox Bar",
            ChartType::GridBar => "Grid Bar",
        }
    }
}

/// Aggregation applied to the measure axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    /// Number of rows per bucket.
    Count,
    /// Sum of the measure per bucket.
    Sum,
    /// Mean of the measure per bucket.
    Mean,
}

impl Aggregate {
    /// Operation name understood by declarative chart renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum => "sum",
            Aggregate::Mean => "mean",
        }
    }
}
