//! Chart candidate enumeration.

use tracing::debug;

use super::candidate::ChartPlan;
use super::scoring::ScoringConfig;
use crate::schema::{Aggregate, ChartType, ColumnProfile, DatasetProfile, Dtype};

/// Enumerates chart plans over a closed vocabulary of chart types.
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    config: ScoringConfig,
}

impl CandidateGenerator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Enumerate every plausible plan for a profile, in a fixed order.
    ///
    /// Constant and identifier columns never take part in pairings. A table
    /// plan over all columns is always included when the profile has columns.
    pub fn generate(&self, profile: &DatasetProfile) -> Vec<ChartPlan> {
        let pairable: Vec<&ColumnProfile> =
            profile.columns.iter().filter(|c| c.is_pairable()).collect();
        let temporal: Vec<&ColumnProfile> = pairable
            .iter()
            .copied()
            .filter(|c| c.dtype == Dtype::Temporal)
            .collect();
        let numeric: Vec<&ColumnProfile> = pairable
            .iter()
            .copied()
            .filter(|c| c.dtype == Dtype::Numeric)
            .collect();
        let categorical: Vec<&ColumnProfile> = pairable
            .iter()
            .copied()
            .filter(|c| c.is_plain_categorical() && c.unique_count <= self.config.max_category_count)
            .collect();

        let mut plans = Vec::new();

        for t in &temporal {
            for n in &numeric {
                let mut plan = ChartPlan::new(ChartType::Line, &t.name).with_y(&n.name);
                if has_repeats(t) {
                    plan = plan.with_aggregate(Aggregate::Sum);
                }
                plans.push(plan);
            }
        }

        for c in &categorical {
            for n in &numeric {
                let plan = ChartPlan::new(ChartType::Bar, &c.name).with_y(&n.name);
                if has_repeats(c) {
                    plans.push(plan.clone().with_aggregate(Aggregate::Sum));
                    plans.push(plan.with_aggregate(Aggregate::Mean));
                } else {
                    plans.push(plan);
                }
            }
        }

        for (i, x) in numeric.iter().enumerate() {
            for y in &numeric[i + 1..] {
                plans.push(ChartPlan::new(ChartType::Scatter, &x.name).with_y(&y.name));
            }
        }

        for n in &numeric {
            plans.push(ChartPlan::new(ChartType::Histogram, &n.name));
        }

        for c in categorical.iter().filter(|c| !c.is_likert && has_repeats(c)) {
            plans.push(
                ChartPlan::new(ChartType::Bar, &c.name).with_aggregate(Aggregate::Count),
            );
        }

        for t in temporal.iter().filter(|t| has_repeats(t)) {
            plans.push(
                ChartPlan::new(ChartType::Line, &t.name).with_aggregate(Aggregate::Count),
            );
        }

        let stackable: Vec<&ColumnProfile> = categorical
            .iter()
            .copied()
            .filter(|c| c.unique_count <= self.config.max_color_count)
            .take(self.config.max_stacked_columns)
            .collect();
        for (i, x) in stackable.iter().enumerate() {
            for color in &stackable[i + 1..] {
                plans.push(
                    ChartPlan::new(ChartType::Bar, &x.name)
                        .with_color(&color.name)
                        .with_aggregate(Aggregate::Count),
                );
            }
        }

        for column in profile.columns.iter().filter(|c| c.is_likert) {
            plans.push(
                ChartPlan::new(ChartType::LikertBar, &column.name).with_aggregate(Aggregate::Count),
            );
        }

        for column in profile.columns.iter().filter(|c| c.is_checkbox) {
            plans.push(
                ChartPlan::new(ChartType::CheckboxBar, &column.name)
                    .with_aggregate(Aggregate::Count),
            );
        }

        for (stem, positions) in profile.grid_index() {
            let members: Vec<String> = positions
                .iter()
                .filter_map(|&p| profile.columns.get(p))
                .map(|c| c.name.clone())
                .collect();
            if members.len() < 2 {
                continue;
            }
            debug!(stem = %stem, members = members.len(), "Grid candidate");
            plans.push(
                ChartPlan::new(ChartType::GridBar, members[0].clone()).with_group_columns(members),
            );
        }

        if let Some(first) = profile.columns.first() {
            plans.push(
                ChartPlan::new(ChartType::Table, &first.name)
                    .with_group_columns(profile.columns.iter().map(|c| c.name.clone()).collect()),
            );
        }

        debug!(
            candidates = plans.len(),
            temporal = temporal.len(),
            numeric = numeric.len(),
            categorical = categorical.len(),
            "Candidates generated"
        );
        plans
    }
}

/// At least one non-null value occurs more than once.
fn has_repeats(column: &ColumnProfile) -> bool {
    column.unique_count < column.non_null_count()
}
