//! Ordered chain of column type detectors.
//!
//! Each detector pairs a predicate with an extractor: it either claims the
//! column and returns a tagged [`Detection`] carrying the facts it extracted,
//! or declines. The first detector that claims a column wins; a column no
//! detector claims is nominal.

use indexmap::IndexMap;

use super::column::ProfilerConfig;
use super::likert::{LikertMatch, match_scale};
use super::stats::StreamingStats;
use super::values::{cell_number, cell_temporal, format_iso};
use crate::input::CellValue;
use crate::schema::{Dtype, TemporalRange};

/// Non-null values of one column, prepared once for every detector.
#[derive(Debug)]
pub struct ColumnSample<'a> {
    /// Non-null cells in source order.
    pub cells: Vec<&'a CellValue>,
    /// Canonical text of each non-null cell, parallel to `cells`.
    pub texts: Vec<String>,
    /// Distinct texts with their counts, in first-seen order.
    pub distinct: IndexMap<String, usize>,
}

impl<'a> ColumnSample<'a> {
    pub fn new(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut cells = Vec::new();
        let mut texts = Vec::new();
        let mut distinct: IndexMap<String, usize> = IndexMap::new();
        for cell in values {
            if let Some(text) = cell.as_text() {
                *distinct.entry(text.clone()).or_insert(0) += 1;
                cells.push(cell);
                texts.push(text);
            }
        }
        Self {
            cells,
            texts,
            distinct,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn distinct_values(&self) -> Vec<String> {
        self.distinct.keys().cloned().collect()
    }
}

/// Summary of a numeric column over the values that parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
}

/// What a detector established about a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Temporal(TemporalRange),
    Numeric(NumericSummary),
    Likert(LikertMatch),
    Checkbox { options: Vec<String> },
}

impl Detection {
    /// The dtype implied by this detection.
    pub fn dtype(&self) -> Dtype {
        match self {
            Detection::Temporal(_) => Dtype::Temporal,
            Detection::Numeric(_) => Dtype::Numeric,
            Detection::Likert(_) => Dtype::Ordinal,
            Detection::Checkbox { .. } => Dtype::Nominal,
        }
    }
}

/// A predicate plus extractor over a prepared column sample.
pub trait Detector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Claim the column by returning a detection, or decline with `None`.
    fn detect(&self, sample: &ColumnSample<'_>, config: &ProfilerConfig) -> Option<Detection>;
}

/// Dates and timestamps parsing above the configured rate.
#[derive(Debug, Default)]
pub struct TemporalDetector;

impl Detector for TemporalDetector {
    fn name(&self) -> &'static str {
        "temporal"
    }

    fn detect(&self, sample: &ColumnSample<'_>, config: &ProfilerConfig) -> Option<Detection> {
        let parsed: Vec<_> = sample.cells.iter().filter_map(|c| cell_temporal(c)).collect();
        if parsed.is_empty() || rate(parsed.len(), sample.len()) < config.temporal_parse_rate {
            return None;
        }
        let start = parsed.iter().min()?;
        let end = parsed.iter().max()?;
        Some(Detection::Temporal(TemporalRange {
            start: format_iso(start),
            end: format_iso(end),
        }))
    }
}

/// Numbers (after currency and percent stripping) above the configured rate.
#[derive(Debug, Default)]
pub struct NumericDetector;

impl Detector for NumericDetector {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn detect(&self, sample: &ColumnSample<'_>, config: &ProfilerConfig) -> Option<Detection> {
        let stats: StreamingStats = sample.cells.iter().filter_map(|c| cell_number(c)).collect();
        if stats.count() == 0 || rate(stats.count(), sample.len()) < config.numeric_parse_rate {
            return None;
        }
        Some(Detection::Numeric(NumericSummary {
            min: stats.min()?,
            max: stats.max()?,
            mean: stats.mean()?,
            std: stats.std()?,
            median: stats.median()?,
        }))
    }
}

/// Distinct values forming a known rating scale.
#[derive(Debug, Default)]
pub struct LikertDetector;

impl Detector for LikertDetector {
    fn name(&self) -> &'static str {
        "likert"
    }

    fn detect(&self, sample: &ColumnSample<'_>, config: &ProfilerConfig) -> Option<Detection> {
        match_scale(&sample.distinct_values(), config.likert_min_levels).map(Detection::Likert)
    }
}

/// Delimiter-joined multi-select answers over a small shared vocabulary.
#[derive(Debug, Default)]
pub struct CheckboxDetector;

impl Detector for CheckboxDetector {
    fn name(&self) -> &'static str {
        "checkbox"
    }

    fn detect(&self, sample: &ColumnSample<'_>, config: &ProfilerConfig) -> Option<Detection> {
        if sample.len() < 2 {
            return None;
        }
        let delimited = sample.texts.iter().filter(|t| t.contains([',', ';'])).count();
        if rate(delimited, sample.len()) < config.checkbox_min_delimited_share {
            return None;
        }

        let mut vocabulary: IndexMap<&str, usize> = IndexMap::new();
        let mut positions: IndexMap<&str, usize> = IndexMap::new();
        let mut token_counts: Vec<usize> = Vec::new();
        let mut moves = false;
        let mut total_tokens = 0usize;
        let mut total_len = 0usize;
        for text in &sample.texts {
            let mut in_cell = 0;
            for (position, token) in split_tokens(text).enumerate() {
                *vocabulary.entry(token).or_insert(0) += 1;
                moves |= *positions.entry(token).or_insert(position) != position;
                total_tokens += 1;
                total_len += token.chars().count();
                in_cell += 1;
            }
            if !token_counts.contains(&in_cell) {
                token_counts.push(in_cell);
            }
        }

        if vocabulary.len() < 2 || vocabulary.len() > config.checkbox_max_vocabulary {
            return None;
        }
        // Fixed-shape values such as `City, ST` never vary in length and
        // keep each token in one slot.
        if token_counts.len() < 2 && !moves {
            return None;
        }
        if (total_tokens as f64) < config.checkbox_min_repeat_ratio * vocabulary.len() as f64 {
            return None;
        }
        if total_len as f64 / total_tokens as f64 > config.checkbox_max_token_length {
            return None;
        }

        // Stable sort keeps first appearance among equal counts.
        let mut options: Vec<(&str, usize)> = vocabulary.into_iter().collect();
        options.sort_by(|a, b| b.1.cmp(&a.1));
        Some(Detection::Checkbox {
            options: options.into_iter().map(|(t, _)| t.to_string()).collect(),
        })
    }
}

/// Split a multi-select cell into trimmed, non-empty tokens.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split([',', ';']).map(str::trim).filter(|t| !t.is_empty())
}

/// Ordered list of detectors run against every column.
pub struct DetectorChain {
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self {
            detectors: vec![
                Box::new(TemporalDetector),
                Box::new(NumericDetector),
                Box::new(LikertDetector),
                Box::new(CheckboxDetector),
            ],
        }
    }
}

impl std::fmt::Debug for DetectorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.detectors.iter().map(|d| d.name()))
            .finish()
    }
}

impl DetectorChain {
    /// An empty chain; every column profiles as nominal.
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Append a detector after the existing ones.
    pub fn with(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Run detectors in order and return the first claim.
    pub fn detect(
        &self,
        sample: &ColumnSample<'_>,
        config: &ProfilerConfig,
    ) -> Option<(&'static str, Detection)> {
        if sample.is_empty() {
            return None;
        }
        self.detectors
            .iter()
            .find_map(|d| d.detect(sample, config).map(|found| (d.name(), found)))
    }
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
