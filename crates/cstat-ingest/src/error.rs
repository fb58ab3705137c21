//! Error types for the delimited-file boundary.

use std::path::PathBuf;

use thiserror::Error;

use cstat_model::SourceDataset;

/// Errors that can occur while reading or writing pipeline files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory missing and could not be created, or not writable.
    #[error("output directory {path} is not writable: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or move an output file.
    #[error("failed to write {path}: {message}")]
    FileWrite { path: PathBuf, message: String },

    // === CSV Parsing Errors ===
    /// Failed to parse the delimited file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// File has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Schema Errors ===
    /// Required column not present in the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Source Errors ===
    /// Raw dataset is not available where the pipeline expects it.
    #[error("{dataset} dataset ({catalogue_id}) is not available at {path}")]
    DatasetUnavailable {
        dataset: SourceDataset,
        catalogue_id: &'static str,
        path: PathBuf,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
