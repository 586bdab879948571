//! Chart candidates: generation, scoring and ranking, titles and specs.

mod candidate;
mod generator;
mod recommender;
mod scoring;
mod spec;
mod title;

pub use candidate::{ChartCandidate, ChartPlan};
pub use generator::CandidateGenerator;
pub use recommender::ChartRecommender;
pub use scoring::{
    ChartPriors, RECOMMENDED_GROUP, ScoredPlan, ScoringConfig, group_name, rank, rank_order,
    score_candidate,
};
pub use spec::{DATA_SOURCE, SpecSynthesizer, VEGA_LITE_SCHEMA, field_name};
pub use title::{MAX_TITLE_CHARS, describe, generate_title, humanize, label, truncate_title};
