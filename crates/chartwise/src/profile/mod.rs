//! Column and dataset profiling.
//!
//! Each column is classified by an ordered [`DetectorChain`] (temporal,
//! numeric, rating scale, multi-select) and summarized into a
//! [`ColumnProfile`](crate::schema::ColumnProfile). Grid questions are found
//! afterwards by a read-only pass over the finished profiles.

mod column;
mod dataset;
mod detectors;
mod grid;
pub mod likert;
pub mod stats;
pub mod values;

pub use column::{ColumnProfiler, ProfilerConfig};
pub use dataset::DatasetProfiler;
pub use detectors::{
    CheckboxDetector, ColumnSample, Detection, Detector, DetectorChain, LikertDetector,
    NumericDetector, NumericSummary, TemporalDetector, split_tokens,
};
pub use grid::{assign_grid_groups, split_grid_header};
