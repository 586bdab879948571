//! Candidate generation, ranking and presentation in one pass.

use tracing::debug;

use super::candidate::ChartCandidate;
use super::generator::CandidateGenerator;
use super::scoring::{ScoringConfig, rank};
use super::spec::SpecSynthesizer;
use super::title::{describe, generate_title};
use crate::schema::DatasetProfile;

/// Turns a dataset profile into a ranked list of presentable charts.
#[derive(Debug, Clone)]
pub struct ChartRecommender {
    generator: CandidateGenerator,
    config: ScoringConfig,
    synthesizer: SpecSynthesizer,
    max_candidates: usize,
}

impl Default for ChartRecommender {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), 50)
    }
}

impl ChartRecommender {
    pub fn new(config: ScoringConfig, max_candidates: usize) -> Self {
        Self {
            generator: CandidateGenerator::new(config.clone()),
            config,
            synthesizer: SpecSynthesizer::new(),
            max_candidates,
        }
    }

    /// Ranked candidates, best first, at most `max_candidates` long.
    ///
    /// The first candidate is the recommendation and is the maximum-score
    /// element of everything generated.
    pub fn recommend(&self, profile: &DatasetProfile) -> Vec<ChartCandidate> {
        let plans = self.generator.generate(profile);
        let generated = plans.len();
        let mut ranked = rank(plans, profile, &self.config);
        ranked.truncate(self.max_candidates.max(1));

        if ranked.len() < generated {
            debug!(generated, kept = ranked.len(), "Candidate list truncated");
        }

        ranked
            .into_iter()
            .map(|entry| {
                let title = generate_title(&entry.plan, profile);
                let description = describe(&entry.plan, profile);
                let spec = self.synthesizer.synthesize(&entry.plan, profile, &title);
                let plan = entry.plan;
                ChartCandidate {
                    chart_type: plan.chart_type,
                    x_column: plan.x_column,
                    y_column: plan.y_column,
                    color_column: plan.color_column,
                    aggregate: plan.aggregate,
                    group_columns: plan.group_columns,
                    title,
                    description,
                    score: entry.score,
                    spec,
                    group_name: Some(entry.group_name),
                    group_score: Some(entry.group_score),
                }
            })
            .collect()
    }
}
