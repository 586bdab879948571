//! Whole-table profiling.

use rayon::prelude::*;
use tracing::debug;

use super::column::{ColumnProfiler, ProfilerConfig};
use super::grid::assign_grid_groups;
use crate::input::DataTable;
use crate::schema::DatasetProfile;

/// Runs the column profiler over every column, then the grid pass.
#[derive(Debug, Default)]
pub struct DatasetProfiler {
    column_profiler: ColumnProfiler,
}

impl DatasetProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self {
            column_profiler: ColumnProfiler::new(config),
        }
    }

    pub fn with_column_profiler(column_profiler: ColumnProfiler) -> Self {
        Self { column_profiler }
    }

    /// Profile a table.
    ///
    /// Columns are profiled independently and in parallel; results keep
    /// source order. A table without rows or columns yields an empty profile.
    pub fn profile(&self, table: &DataTable) -> DatasetProfile {
        if table.row_count() == 0 || table.column_count() == 0 {
            return DatasetProfile::new(0, Vec::new());
        }

        let columns: Vec<_> = (0..table.column_count())
            .into_par_iter()
            .map(|idx| {
                self.column_profiler.profile(
                    &table.headers[idx],
                    &table.original_headers[idx],
                    idx,
                    table.column_values(idx),
                )
            })
            .collect();

        let columns = assign_grid_groups(columns);
        let profile = DatasetProfile::new(table.row_count(), columns);
        debug!(
            rows = profile.row_count,
            columns = profile.col_count,
            grid_groups = profile.grid_index().len(),
            "Dataset profiled"
        );
        profile
    }
}
