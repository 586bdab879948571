//! Insight sentences for the recommendation and surprise selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::findings::{Finding, count_phrase, find, format_number};
use crate::chart::ChartCandidate;
use crate::error::{ChartwiseError, Result};
use crate::input::DataTable;
use crate::schema::{ChartType, DatasetProfile};

/// Thresholds for insight phrasing and surprise selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Maximum number of insight sentences.
    pub max_insights: usize,
    /// Candidates ranked inside the top K are never a surprise.
    pub surprise_top_k: usize,
    /// Standard deviations from the mean that flag an anomaly.
    pub anomaly_sigma: f64,
    /// Percent change under which a trend is called stable.
    pub stable_change_pct: f64,
    /// Leader-to-runner-up ratio phrased as dominance.
    pub dominance_ratio: f64,
    /// Leader-to-runner-up ratio phrased as a clear lead.
    pub leader_ratio: f64,
    /// Missing-cell percentage that triggers a data quality note.
    pub missing_data_pct: f64,
    /// IQR multiplier for outlier fences.
    pub outlier_iqr: f64,
    /// Points a time series needs before month-of-year seasonality is checked.
    pub seasonal_min_points: usize,
    /// Distinct calendar months a seasonal series must cover.
    pub seasonal_min_months: usize,
    /// Coefficient of variation of monthly means that counts as seasonal.
    pub seasonal_variation: f64,
    /// Peak-to-low ratio of monthly means that counts as seasonal.
    pub seasonal_peak_ratio: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_insights: 4,
            surprise_top_k: 3,
            anomaly_sigma: 2.0,
            stable_change_pct: 5.0,
            dominance_ratio: 2.0,
            leader_ratio: 1.5,
            missing_data_pct: 5.0,
            outlier_iqr: 1.5,
            seasonal_min_points: 12,
            seasonal_min_months: 6,
            seasonal_variation: 0.2,
            seasonal_peak_ratio: 1.3,
        }
    }
}

impl InsightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_insights == 0 {
            return Err(ChartwiseError::Config(
                "insight.max_insights must be at least 1".to_string(),
            ));
        }
        if self.anomaly_sigma <= 0.0 || self.outlier_iqr <= 0.0 {
            return Err(ChartwiseError::Config(
                "insight.anomaly_sigma and insight.outlier_iqr must be positive".to_string(),
            ));
        }
        if self.leader_ratio < 1.0 || self.dominance_ratio < self.leader_ratio {
            return Err(ChartwiseError::Config(
                "insight ratios must satisfy 1 <= leader_ratio <= dominance_ratio".to_string(),
            ));
        }
        Ok(())
    }
}

/// A lower-ranked chart worth a look, with what it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surprise {
    pub candidate: ChartCandidate,
    pub insight: String,
    /// How pronounced the chart's own pattern is (0.0-1.0).
    pub novelty: f64,
}

/// Derives insight sentences from ranked candidates.
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    /// Sentences for the recommended chart, then dataset notes.
    ///
    /// Always returns at least one sentence for a non-empty profile.
    pub fn insights(
        &self,
        recommended: &ChartCandidate,
        table: &DataTable,
        profile: &DatasetProfile,
    ) -> Vec<String> {
        let mut insights = find(recommended, table, profile, &self.config)
            .map(|f| f.sentences)
            .unwrap_or_default();

        let cells = profile.row_count * profile.col_count;
        let missing: usize = profile.columns.iter().map(|c| c.null_count).sum();
        if cells > 0 && missing > 0 {
            let pct = missing as f64 / cells as f64 * 100.0;
            if pct > self.config.missing_data_pct {
                insights.push(format!(
                    "The dataset has {} missing values ({pct:.1}% of cells).",
                    format_number(missing as f64)
                ));
            }
        }

        if insights.is_empty() {
            insights.push(format!(
                "Analyzed {} and {}.",
                count_phrase(profile.row_count, "row"),
                count_phrase(profile.col_count, "column")
            ));
        }
        insights.truncate(self.config.max_insights);
        insights
    }

    /// Pick the candidate outside the top K whose own pattern is strongest.
    ///
    /// Candidates reading the same column pair as the recommendation and
    /// table charts are skipped. Ties keep the better-ranked candidate.
    pub fn surprise(
        &self,
        ranked: &[ChartCandidate],
        table: &DataTable,
        profile: &DatasetProfile,
    ) -> Option<Surprise> {
        let recommended = ranked.first()?;
        let primary_pair = recommended.column_pair();

        let mut best: Option<(usize, Finding)> = None;
        for (rank, candidate) in ranked.iter().enumerate().skip(self.config.surprise_top_k) {
            if candidate.chart_type == ChartType::Table || candidate.column_pair() == primary_pair {
                continue;
            }
            let Some(finding) = find(candidate, table, profile, &self.config) else {
                continue;
            };
            if finding.strength <= 0.0 || finding.sentences.is_empty() {
                continue;
            }
            if best.as_ref().is_none_or(|(_, b)| finding.strength > b.strength) {
                best = Some((rank, finding));
            }
        }

        let (rank, finding) = best?;
        debug!(rank, novelty = finding.strength, "Surprise selected");
        let candidate = ranked[rank].clone();
        Some(Surprise {
            insight: finding.sentences.into_iter().next()?,
            novelty: (finding.strength * 1e6).round() / 1e6,
            candidate,
        })
    }
}
