//! Delimited-file boundary of the country statistics pipeline.
//!
//! Every stage reads plain delimited files and writes plain delimited files
//! with a leading `id` row-index column. This crate owns that boundary:
//! header validation, whole-file loading into Polars, indexed writing, and
//! staged output batches that land in the output directory together.

pub mod csv;
pub mod error;
pub mod polars_utils;
pub mod source;

pub use crate::csv::{
    StagedOutput, read_csv_frame, read_csv_headers, require_columns, write_indexed_csv,
};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_string, format_numeric, parse_i64, preview_rows};
pub use source::{DatasetFetcher, LocalDirectory};
