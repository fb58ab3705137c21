//! Star-schema frame type.
//!
//! [`StarFrame`] pairs a Polars DataFrame with the output table it becomes,
//! so file naming and column order come from one place.

use polars::prelude::DataFrame;

use cstat_model::StarTable;

/// A produced star-schema table.
#[derive(Debug, Clone)]
pub struct StarFrame {
    /// Which of the seven output tables this is.
    pub table: StarTable,
    /// The table contents, without the `id` index column.
    pub data: DataFrame,
}

impl StarFrame {
    pub fn new(table: StarTable, data: DataFrame) -> Self {
        Self { table, data }
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn file_name(&self) -> &'static str {
        self.table.file_name()
    }
}
