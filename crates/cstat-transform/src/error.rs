//! Error types for the transformation pipeline.

use thiserror::Error;

use cstat_ingest::IngestError;

/// Errors that abort a transformation stage.
///
/// Numeric problems (division by zero, nothing to impute from) are not
/// errors; they surface as missing values and in the build report.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required column is absent from an input table.
    #[error("required column '{column}' not found in {table} table")]
    MissingColumn { table: &'static str, column: String },

    /// A table that feeds a (Country, Year) join has a repeated key.
    #[error("{table} table has duplicate (Country, Year) key ({country}, {year})")]
    DuplicateKey {
        table: &'static str,
        country: String,
        year: i64,
    },

    /// Two GDP columns carry the same year label.
    #[error("GDP table has more than one column for year {year}")]
    DuplicateYearColumn { year: i64 },

    /// The GDP table has no year columns left after dropping excluded years.
    #[error("GDP table has no year columns")]
    NoYearColumns,

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
