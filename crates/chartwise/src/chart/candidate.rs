//! Chart plans and ranked chart candidates.

use serde::{Deserialize, Serialize};

use crate::schema::{Aggregate, ChartType};

/// What to draw: a chart type plus the columns it reads.
///
/// Plans are produced by the generator and carry no score or presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub chart_type: ChartType,
    pub x_column: String,
    pub y_column: Option<String>,
    pub color_column: Option<String>,
    pub aggregate: Option<Aggregate>,
    /// Member columns of a grid chart, or the columns shown by a table.
    pub group_columns: Vec<String>,
}

impl ChartPlan {
    pub fn new(chart_type: ChartType, x_column: impl Into<String>) -> Self {
        Self {
            chart_type,
            x_column: x_column.into(),
            y_column: None,
            color_column: None,
            aggregate: None,
            group_columns: Vec::new(),
        }
    }

    pub fn with_y(mut self, y_column: impl Into<String>) -> Self {
        self.y_column = Some(y_column.into());
        self
    }

    pub fn with_color(mut self, color_column: impl Into<String>) -> Self {
        self.color_column = Some(color_column.into());
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn with_group_columns(mut self, columns: Vec<String>) -> Self {
        self.group_columns = columns;
        self
    }

    /// Every column this plan reads, without duplicates, x first.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.x_column.as_str()];
        let extra = self
            .y_column
            .iter()
            .chain(self.color_column.iter())
            .chain(self.group_columns.iter());
        for name in extra {
            if !columns.contains(&name.as_str()) {
                columns.push(name);
            }
        }
        columns
    }
}

/// A scored, presentable chart proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartCandidate {
    pub chart_type: ChartType,
    pub x_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_columns: Vec<String>,
    pub title: String,
    /// Why this chart was proposed.
    pub description: String,
    /// Higher is better; comparable only within one analysis.
    pub score: f64,
    /// Declarative rendering payload (Vega-Lite).
    pub spec: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_score: Option<f64>,
}

impl ChartCandidate {
    /// The plan this candidate was built from.
    pub fn plan(&self) -> ChartPlan {
        ChartPlan {
            chart_type: self.chart_type,
            x_column: self.x_column.clone(),
            y_column: self.y_column.clone(),
            color_column: self.color_column.clone(),
            aggregate: self.aggregate,
            group_columns: self.group_columns.clone(),
        }
    }

    /// Unordered pair of primary columns, used to tell charts apart.
    pub fn column_pair(&self) -> (String, Option<String>) {
        let second = self.y_column.clone().or_else(|| self.color_column.clone());
        match &second {
            Some(s) if s.as_str() < self.x_column.as_str() => {
                (s.clone(), Some(self.x_column.clone()))
            }
            _ => (self.x_column.clone(), second),
        }
    }
}
