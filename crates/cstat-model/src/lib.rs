//! Shared vocabulary for the country statistics warehouse.
//!
//! This crate provides the pieces every other crate agrees on:
//!
//! - **columns**: canonical column names of normalized and output tables
//! - **dataset**: the three raw source datasets and their catalogue metadata
//! - **table**: the seven star-schema output tables and the loader contract
//! - **config**: explicit pipeline configuration and imputation policy

pub mod columns;
pub mod config;
pub mod dataset;
pub mod error;
pub mod table;

pub use config::{ImputationPolicy, InputPaths, PipelineConfig};
pub use dataset::SourceDataset;
pub use error::{ConfigError, Result};
pub use table::{StarTable, TableKind};
