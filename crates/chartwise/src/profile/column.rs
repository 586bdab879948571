//! Per-column profiling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::detectors::{ColumnSample, Detection, DetectorChain};
use crate::error::{ChartwiseError, Result};
use crate::input::CellValue;
use crate::schema::{ColumnProfile, Dtype};

/// Thresholds for dtype and survey-structure detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Minimum share of non-null values that must parse as timestamps.
    pub temporal_parse_rate: f64,
    /// Minimum share of non-null values that must parse as numbers.
    pub numeric_parse_rate: f64,
    /// Minimum number of distinct scale levels for a rating column.
    pub likert_min_levels: usize,
    /// Minimum share of values containing `,` or `;` for a checkbox column.
    pub checkbox_min_delimited_share: f64,
    /// Maximum distinct tokens in a checkbox vocabulary.
    pub checkbox_max_vocabulary: usize,
    /// Total tokens must reach this multiple of the vocabulary size.
    pub checkbox_min_repeat_ratio: f64,
    /// Maximum mean token length in characters.
    pub checkbox_max_token_length: f64,
    /// Number of raw example values kept per column.
    pub example_count: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            temporal_parse_rate: 0.9,
            numeric_parse_rate: 0.9,
            likert_min_levels: 2,
            checkbox_min_delimited_share: 0.2,
            checkbox_max_vocabulary: 30,
            checkbox_min_repeat_ratio: 1.25,
            checkbox_max_token_length: 40.0,
            example_count: 3,
        }
    }
}

impl ProfilerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("temporal_parse_rate", self.temporal_parse_rate),
            ("numeric_parse_rate", self.numeric_parse_rate),
            ("checkbox_min_delimited_share", self.checkbox_min_delimited_share),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ChartwiseError::Config(format!(
                    "profiler.{name} must be in (0, 1], got {value}"
                )));
            }
        }
        if self.checkbox_max_vocabulary < 2 {
            return Err(ChartwiseError::Config(
                "profiler.checkbox_max_vocabulary must be at least 2".to_string(),
            ));
        }
        if self.checkbox_min_repeat_ratio < 1.0 || self.checkbox_max_token_length <= 0.0 {
            return Err(ChartwiseError::Config(
                "profiler checkbox thresholds out of range".to_string(),
            ));
        }
        Ok(())
    }
}

/// Profiles a single column from its raw values.
#[derive(Debug, Default)]
pub struct ColumnProfiler {
    config: ProfilerConfig,
    chain: DetectorChain,
}

impl ColumnProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self {
            config,
            chain: DetectorChain::default(),
        }
    }

    /// Replace the detector chain.
    pub fn with_chain(mut self, chain: DetectorChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile one column. Never fails: anything unrecognized is nominal.
    pub fn profile<'a>(
        &self,
        name: &str,
        original_name: &str,
        position: usize,
        values: impl IntoIterator<Item = &'a CellValue>,
    ) -> ColumnProfile {
        let mut count = 0usize;
        let sample = ColumnSample::new(values.into_iter().inspect(|_| count += 1));

        let mut profile = ColumnProfile::new(name, original_name, position);
        profile.count = count;
        profile.null_count = count - sample.len();
        profile.unique_count = sample.distinct.len();
        profile.examples = sample
            .texts
            .iter()
            .take(self.config.example_count)
            .cloned()
            .collect();

        match self.chain.detect(&sample, &self.config) {
            Some((detector, detection)) => {
                debug!(column = name, detector, dtype = ?detection.dtype(), "Column classified");
                apply_detection(&mut profile, detection);
            }
            None => {
                debug!(column = name, "Column defaults to nominal");
            }
        }

        profile.is_identifier = matches!(profile.dtype, Dtype::Numeric | Dtype::Nominal)
            && !profile.is_checkbox
            && is_id_name(name)
            && sample.len() >= 2
            && profile.unique_count == sample.len();

        profile
    }
}

fn apply_detection(profile: &mut ColumnProfile, detection: Detection) {
    profile.dtype = detection.dtype();
    match detection {
        Detection::Temporal(range) => {
            profile.temporal_range = Some(range);
        }
        Detection::Numeric(summary) => {
            profile.min = Some(summary.min);
            profile.max = Some(summary.max);
            profile.mean = Some(summary.mean);
            profile.std = Some(summary.std);
            profile.median = Some(summary.median);
        }
        Detection::Likert(found) => {
            profile.is_likert = true;
            profile.likert_scale = Some(found.scale.to_string());
            profile.likert_order = found.order;
        }
        Detection::Checkbox { options } => {
            profile.is_checkbox = true;
            profile.checkbox_options = options;
        }
    }
}

/// `id`, `user_id`, `Order ID`, `customerId` and similar.
fn is_id_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    if lower == "id" || lower == "uuid" {
        return true;
    }
    if ["_id", " id", "-id"].iter().any(|s| lower.ends_with(s)) {
        return true;
    }
    // camelCase suffix: a lowercase letter followed by "Id"
    let chars: Vec<char> = name.trim().chars().collect();
    chars.len() > 2
        && chars.ends_with(&['I', 'd'])
        && chars[chars.len() - 3].is_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, values: &[&str]) -> ColumnProfile {
        let cells: Vec<CellValue> = values.iter().map(|v| CellValue::from(*v)).collect();
        ColumnProfiler::default().profile(name, name, 0, &cells)
    }

    #[test]
    fn test_numeric_profile() {
        let p = profile("value", &["10", "12", "5", "6", "4"]);
        assert_eq!(p.dtype, Dtype::Numeric);
        assert_eq!(p.count, 5);
        assert_eq!(p.null_count, 0);
        assert_eq!(p.unique_count, 5);
        assert_eq!(p.min, Some(4.0));
        assert_eq!(p.max, Some(12.0));
        assert!((p.mean.unwrap() - 7.4).abs() < 1e-9);
        assert_eq!(p.median, Some(6.0));
        assert_eq!(p.examples, vec!["10", "12", "5"]);
        assert!(!p.is_identifier);
    }

    #[test]
    fn test_all_null_column_is_nominal() {
        let p = profile("empty", &["", "NA", "null"]);
        assert_eq!(p.dtype, Dtype::Nominal);
        assert_eq!(p.unique_count, 0);
        assert_eq!(p.null_count, 3);
        assert!(p.examples.is_empty());
        assert!(p.min.is_none());
    }

    #[test]
    fn test_likert_profile_is_ordinal() {
        let p = profile(
            "satisfaction",
            &["Satisfied", "Very Satisfied", "Neutral", "Dissatisfied"],
        );
        assert_eq!(p.dtype, Dtype::Ordinal);
        assert!(p.is_likert);
        assert!(!p.is_checkbox);
        assert_eq!(p.likert_order.first().map(String::as_str), Some("Very Satisfied"));
        assert_eq!(p.likert_order.last().map(String::as_str), Some("Dissatisfied"));
        assert_eq!(p.likert_scale.as_deref(), Some("satisfaction"));
    }

    #[test]
    fn test_checkbox_profile_is_nominal() {
        let p = profile("devices", &["Mobile, Desktop", "Desktop", "Mobile, Tablet"]);
        assert_eq!(p.dtype, Dtype::Nominal);
        assert!(p.is_checkbox);
        assert!(!p.is_likert);
        assert_eq!(p.checkbox_options, vec!["Mobile", "Desktop", "Tablet"]);
    }

    #[test]
    fn test_temporal_profile() {
        let p = profile("date", &["2024-01-03", "2024-01-01", "2024-01-02"]);
        assert_eq!(p.dtype, Dtype::Temporal);
        let range = p.temporal_range.unwrap();
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-01-03");
        assert!(p.mean.is_none());
    }

    #[test]
    fn test_identifier_detection() {
        assert!(profile("id", &["1", "2", "3"]).is_identifier);
        assert!(profile("customer_id", &["a1", "b2", "c3"]).is_identifier);
        assert!(profile("orderId", &["1", "2", "3"]).is_identifier);
        assert!(!profile("id", &["1", "1", "2"]).is_identifier);
        assert!(!profile("paid", &["1", "2", "3"]).is_identifier);
    }

    #[test]
    fn test_is_id_name() {
        assert!(is_id_name("ID"));
        assert!(is_id_name("Order ID"));
        assert!(is_id_name("user-id"));
        assert!(is_id_name("Id"));
        assert!(!is_id_name("valid"));
        assert!(!is_id_name("Idea"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ProfilerConfig::default().validate().is_ok());
        let bad = ProfilerConfig {
            numeric_parse_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ChartwiseError::Config(_))));
    }
}
