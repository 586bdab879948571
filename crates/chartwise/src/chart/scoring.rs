//! Candidate scoring, ranking and grouping.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::candidate::ChartPlan;
use super::title::humanize;
use crate::error::{ChartwiseError, Result};
use crate::schema::{Aggregate, ChartType, ColumnProfile, DatasetProfile};

/// Base score for each kind of chart, before adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPriors {
    pub line: f64,
    pub count_line: f64,
    pub bar: f64,
    pub bar_sum: f64,
    pub bar_mean: f64,
    pub count_bar: f64,
    pub stacked_bar: f64,
    pub scatter: f64,
    pub histogram: f64,
    pub likert_bar: f64,
    pub checkbox_bar: f64,
    pub grid_bar: f64,
    pub table: f64,
}

impl Default for ChartPriors {
    fn default() -> Self {
        Self {
            line: 0.95,
            count_line: 0.70,
            bar: 0.85,
            bar_sum: 0.82,
            bar_mean: 0.80,
            count_bar: 0.75,
            stacked_bar: 0.65,
            scatter: 0.70,
            histogram: 0.60,
            likert_bar: 0.80,
            checkbox_bar: 0.75,
            grid_bar: 0.82,
            table: 0.10,
        }
    }
}

/// Scoring rubric and candidate generation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub priors: ChartPriors,
    /// Added to Likert and checkbox charts.
    pub survey_bonus: f64,
    /// Added to grid charts.
    pub grid_bonus: f64,
    /// Category count above which bars start losing score.
    pub ideal_cardinality: usize,
    /// Floor for the cardinality factor.
    pub min_cardinality_factor: f64,
    /// Score lost per unit of null fraction.
    pub null_penalty: f64,
    /// Histograms over fewer distinct values than this are penalized.
    pub sparse_histogram_unique: usize,
    pub sparse_histogram_factor: f64,
    /// Categorical columns above this many categories get no comparison bars.
    pub max_category_count: usize,
    /// Maximum categories of either axis in a stacked bar.
    pub max_color_count: usize,
    /// Only the first N eligible categorical columns are cross-tabulated.
    pub max_stacked_columns: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            priors: ChartPriors::default(),
            survey_bonus: 0.08,
            grid_bonus: 0.10,
            ideal_cardinality: 12,
            min_cardinality_factor: 0.2,
            null_penalty: 0.5,
            sparse_histogram_unique: 5,
            sparse_histogram_factor: 0.7,
            max_category_count: 50,
            max_color_count: 10,
            max_stacked_columns: 4,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ideal_cardinality == 0 || self.max_category_count == 0 || self.max_color_count == 0
        {
            return Err(ChartwiseError::Config(
                "scoring cardinality limits must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("min_cardinality_factor", self.min_cardinality_factor),
            ("null_penalty", self.null_penalty),
            ("sparse_histogram_factor", self.sparse_histogram_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChartwiseError::Config(format!(
                    "scoring.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Base score for a plan's chart kind, survey bonuses included.
    pub fn prior(&self, plan: &ChartPlan) -> f64 {
        let p = &self.priors;
        match plan.chart_type {
            ChartType::Line if plan.y_column.is_some() => p.line,
            ChartType::Line => p.count_line,
            ChartType::Bar if plan.color_column.is_some() => p.stacked_bar,
            ChartType::Bar => match (plan.y_column.is_some(), plan.aggregate) {
                (false, _) => p.count_bar,
                (true, Some(Aggregate::Sum)) => p.bar_sum,
                (true, Some(Aggregate::Mean)) => p.bar_mean,
                (true, _) => p.bar,
            },
            ChartType::Scatter => p.scatter,
            ChartType::Histogram => p.histogram,
            ChartType::Table => p.table,
            ChartType::LikertBar => p.likert_bar + self.survey_bonus,
            ChartType::CheckboxBar => p.checkbox_bar + self.survey_bonus,
            ChartType::GridBar => p.grid_bar + self.grid_bonus,
        }
    }
}

/// Score one plan against the profile. Pure and deterministic.
///
/// `prior × cardinality × completeness`, rounded to six decimals so that
/// equal rubric inputs always compare equal.
pub fn score_candidate(plan: &ChartPlan, profile: &DatasetProfile, config: &ScoringConfig) -> f64 {
    let columns: Vec<&ColumnProfile> = plan
        .columns()
        .into_iter()
        .filter_map(|name| profile.column(name))
        .collect();

    let score = config.prior(plan)
        * cardinality_factor(plan, profile, config)
        * completeness_factor(&columns, config);
    (score * 1e6).round() / 1e6
}

fn cardinality_factor(plan: &ChartPlan, profile: &DatasetProfile, config: &ScoringConfig) -> f64 {
    let shrink = |categories: usize| -> f64 {
        if categories <= config.ideal_cardinality {
            1.0
        } else {
            (config.ideal_cardinality as f64 / categories as f64)
                .sqrt()
                .max(config.min_cardinality_factor)
        }
    };
    let unique = |name: &str| profile.column(name).map_or(0, |c| c.unique_count);

    match plan.chart_type {
        ChartType::Bar => {
            let mut factor = shrink(unique(&plan.x_column));
            if let Some(color) = &plan.color_column {
                factor *= shrink(unique(color));
            }
            factor
        }
        ChartType::LikertBar => shrink(unique(&plan.x_column)),
        ChartType::CheckboxBar => {
            let options = profile
                .column(&plan.x_column)
                .map_or(0, |c| c.checkbox_options.len());
            shrink(options)
        }
        ChartType::Histogram => {
            if unique(&plan.x_column) < config.sparse_histogram_unique {
                config.sparse_histogram_factor
            } else {
                1.0
            }
        }
        ChartType::Line | ChartType::Scatter | ChartType::Table | ChartType::GridBar => 1.0,
    }
}

fn completeness_factor(columns: &[&ColumnProfile], config: &ScoringConfig) -> f64 {
    let worst = columns
        .iter()
        .map(|c| c.null_fraction())
        .fold(0.0_f64, f64::max);
    1.0 - config.null_penalty * worst
}

/// A plan with its score and generation index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPlan {
    pub plan: ChartPlan,
    pub score: f64,
    /// Position in generation order; the last tie-breaker.
    pub index: usize,
    pub group_name: String,
    pub group_score: f64,
}

/// Total order used for ranking: score descending, then chart-type
/// priority, then generation order.
pub fn rank_order(a: &ScoredPlan, b: &ScoredPlan) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.plan.chart_type.priority().cmp(&b.plan.chart_type.priority()))
        .then_with(|| a.index.cmp(&b.index))
}

/// Group label shown for the top-ranked chart.
pub const RECOMMENDED_GROUP: &str = "Recommended";

/// Section label for a non-recommended plan.
pub fn group_name(plan: &ChartPlan, profile: &DatasetProfile) -> String {
    match plan.chart_type {
        ChartType::Line => "Trends".to_string(),
        ChartType::Bar if plan.y_column.is_some() || plan.color_column.is_some() => {
            "Comparisons".to_string()
        }
        ChartType::Bar => "Categories".to_string(),
        ChartType::Scatter => "Relationships".to_string(),
        ChartType::Histogram => "Distributions".to_string(),
        ChartType::Table => "Raw Data".to_string(),
        ChartType::LikertBar | ChartType::CheckboxBar | ChartType::GridBar => {
            let column = profile.column(&plan.x_column);
            let topic = match column.and_then(|c| c.grid_group.as_deref()) {
                Some(stem) => stem.to_string(),
                None => column.map_or_else(|| humanize(&plan.x_column), |c| humanize(&c.original_name)),
            };
            format!("Survey: {topic}")
        }
    }
}

/// Score, sort and group plans.
///
/// The first entry is the recommendation. Every other entry carries its
/// section label; a section's score is the best score among its members.
pub fn rank(plans: Vec<ChartPlan>, profile: &DatasetProfile, config: &ScoringConfig) -> Vec<ScoredPlan> {
    let mut scored: Vec<ScoredPlan> = plans
        .into_iter()
        .enumerate()
        .map(|(index, plan)| {
            let score = score_candidate(&plan, profile, config);
            ScoredPlan {
                plan,
                score,
                index,
                group_name: String::new(),
                group_score: 0.0,
            }
        })
        .collect();
    scored.sort_by(rank_order);

    for (position, entry) in scored.iter_mut().enumerate() {
        entry.group_name = if position == 0 {
            RECOMMENDED_GROUP.to_string()
        } else {
            group_name(&entry.plan, profile)
        };
    }

    let mut best: IndexMap<String, f64> = IndexMap::new();
    for entry in &scored {
        let slot = best.entry(entry.group_name.clone()).or_insert(entry.score);
        *slot = slot.max(entry.score);
    }
    for entry in &mut scored {
        entry.group_score = best.get(&entry.group_name).copied().unwrap_or(entry.score);
    }
    scored
}
