//! Main Chartwise engine and public API.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chart::{ChartCandidate, ChartRecommender, ScoringConfig};
use crate::error::{ChartwiseError, Result};
use crate::input::{DataTable, Parser, ParserConfig, Record, SourceMetadata, sanitize_filename};
use crate::insight::{InsightConfig, InsightGenerator, Surprise};
use crate::profile::{DatasetProfiler, ProfilerConfig};
use crate::schema::DatasetProfile;

/// Configuration for a Chartwise analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Column detection thresholds.
    pub profiler: ProfilerConfig,
    /// Scoring rubric.
    pub scoring: ScoringConfig,
    /// Insight thresholds.
    pub insight: InsightConfig,
    /// Maximum ranked candidates kept in the result.
    pub max_candidates: usize,
    /// Maximum rows echoed back in `AnalysisResult::dataset`.
    pub max_dataset_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            profiler: ProfilerConfig::default(),
            scoring: ScoringConfig::default(),
            insight: InsightConfig::default(),
            max_candidates: 50,
            max_dataset_rows: 5000,
        }
    }
}

impl EngineConfig {
    /// Load a (possibly partial) configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ChartwiseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.parser.validate()?;
        self.profiler.validate()?;
        self.scoring.validate()?;
        self.insight.validate()?;
        if self.max_candidates == 0 {
            return Err(ChartwiseError::Config(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if self.max_dataset_rows == 0 {
            return Err(ChartwiseError::Config(
                "max_dataset_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of analyzing one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sanitized file name the data came from.
    pub filename: String,
    /// Metadata about the source file, when read from disk.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<SourceMetadata>,
    pub profile: DatasetProfile,
    /// Top-ranked candidate.
    pub recommended_chart: ChartCandidate,
    /// Every ranked candidate, recommendation first.
    pub alternatives: Vec<ChartCandidate>,
    /// Row-oriented values keyed by column name.
    pub dataset: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub insights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub surprise: Option<Surprise>,
}

/// One labeled section of alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeGroup<'a> {
    pub name: &'a str,
    pub score: f64,
    pub charts: Vec<&'a ChartCandidate>,
}

impl AnalysisResult {
    /// Alternatives bucketed by `group_name`.
    ///
    /// Sections are ordered by group score (highest first), then by where
    /// the group first appears; charts keep their rank order.
    pub fn grouped_alternatives(&self) -> Vec<AlternativeGroup<'_>> {
        let mut groups: Vec<AlternativeGroup<'_>> = Vec::new();
        for chart in &self.alternatives {
            let name = chart.group_name.as_deref().unwrap_or("Other");
            let score = chart.group_score.unwrap_or(chart.score);
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => {
                    group.score = group.score.max(score);
                    group.charts.push(chart);
                }
                None => groups.push(AlternativeGroup {
                    name,
                    score,
                    charts: vec![chart],
                }),
            }
        }
        // Stable sort keeps first-appearance order among equal scores.
        groups.sort_by(|a, b| b.score.total_cmp(&a.score));
        groups
    }

    /// Number of ranked candidates.
    pub fn candidate_count(&self) -> usize {
        self.alternatives.len()
    }
}

/// Main entry point for Chartwise analysis.
pub struct Chartwise {
    config: EngineConfig,
    parser: Parser,
    profiler: DatasetProfiler,
    recommender: ChartRecommender,
    insights: InsightGenerator,
}

impl Chartwise {
    /// Create a new Chartwise instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a Chartwise instance with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser.clone()),
            profiler: DatasetProfiler::new(config.profiler.clone()),
            recommender: ChartRecommender::new(config.scoring.clone(), config.max_candidates),
            insights: InsightGenerator::new(config.insight.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a delimited data file.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<AnalysisResult> {
        let (table, source) = self.parser.parse_file(path.as_ref())?;
        let mut result = self.analyze_table(&source.file, &table)?;
        result.source = Some(source);
        Ok(result)
    }

    /// Analyze row-oriented records keyed by the raw header text.
    pub fn analyze_records(
        &self,
        filename: &str,
        headers: Vec<String>,
        records: Vec<Record>,
    ) -> Result<AnalysisResult> {
        let table = DataTable::from_records(headers, records);
        self.analyze_table(filename, &table)
    }

    /// Profile a data file without ranking charts.
    pub fn profile_file(&self, path: impl AsRef<Path>) -> Result<(DatasetProfile, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path.as_ref())?;
        let table = table.without_empty_rows_and_columns();
        Ok((self.profiler.profile(&table), source))
    }

    /// Run the full pipeline over an in-memory table.
    pub fn analyze_table(&self, filename: &str, table: &DataTable) -> Result<AnalysisResult> {
        let table = table.without_empty_rows_and_columns();
        if table.row_count() == 0 || table.column_count() == 0 {
            return Err(ChartwiseError::InsufficientData(format!(
                "{} rows and {} columns after removing empty rows and columns",
                table.row_count(),
                table.column_count()
            )));
        }

        let profile = self.profiler.profile(&table);
        let ranked = self.recommender.recommend(&profile);
        let recommended_chart = ranked.first().cloned().ok_or_else(|| {
            ChartwiseError::InsufficientData("no chart candidates could be built".to_string())
        })?;

        let insights = self.insights.insights(&recommended_chart, &table, &profile);
        let surprise = self.insights.surprise(&ranked, &table, &profile);

        let dataset = table.to_records(self.config.max_dataset_rows);
        if dataset.len() < table.row_count() {
            warn!(
                rows = table.row_count(),
                kept = dataset.len(),
                "Dataset truncated in result"
            );
        }

        info!(
            rows = profile.row_count,
            columns = profile.col_count,
            candidates = ranked.len(),
            recommended = recommended_chart.chart_type.label(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            filename: sanitize_filename(filename),
            source: None,
            profile,
            recommended_chart,
            alternatives: ranked,
            dataset,
            insights: Some(insights),
            surprise,
        })
    }
}

impl Default for Chartwise {
    fn default() -> Self {
        Self::new()
    }
}
