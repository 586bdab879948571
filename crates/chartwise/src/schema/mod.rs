//! Profile and chart vocabulary shared across the engine.

mod column;
mod table;
mod types;

pub use column::{ColumnProfile, TemporalRange};
pub use table::{DatasetProfile, GridIndex};
pub use types::{Aggregate, ChartType, Dtype};
