//! Natural-language insights and surprise selection.

mod data;
mod findings;
mod generator;

pub use findings::{Finding, find, format_number};
pub use generator::{InsightConfig, InsightGenerator, Surprise};
