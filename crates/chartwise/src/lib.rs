//! Chartwise: zero-configuration chart recommendation for tabular datasets.
//!
//! Chartwise profiles every column of a table, enumerates chart candidates
//! from a small fixed vocabulary, ranks them with a deterministic rubric and
//! describes the winner in plain sentences.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same table always yields the same ranking and scores
//! - **Survey-aware**: rating scales, multi-select answers and grid questions
//!   get dedicated charts
//! - **Renderer-neutral**: every candidate carries a Vega-Lite spec
//!
//! # Example
//!
//! ```no_run
//! use chartwise::Chartwise;
//!
//! let engine = Chartwise::new();
//! let result = engine.analyze("sales.csv").unwrap();
//!
//! println!("Recommended: {}", result.recommended_chart.title);
//! for insight in result.insights.unwrap_or_default() {
//!     println!("- {}", insight);
//! }
//! ```

pub mod chart;
pub mod error;
pub mod input;
pub mod insight;
pub mod profile;
pub mod schema;

mod engine;

pub use crate::engine::{AlternativeGroup, AnalysisResult, Chartwise, EngineConfig};
pub use chart::{ChartCandidate, ChartRecommender, ScoringConfig};
pub use error::{ChartwiseError, Result};
pub use input::{CellValue, DataTable, Parser, ParserConfig, Record, SourceMetadata};
pub use insight::{InsightConfig, InsightGenerator, Surprise};
pub use profile::{DatasetProfiler, ProfilerConfig};
pub use schema::{ChartType, ColumnProfile, DatasetProfile, Dtype};
