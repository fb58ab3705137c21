//! Country statistics transformation pipeline.
//!
//! This crate turns three differently shaped sources into a star schema:
//!
//! - **reshape**: GDP wide (one column per year) to long (one row per country-year)
//! - **normalize**: canonical column names for internet usage and suicide records
//! - **builder**: merges, population imputation, derived metrics, dimension
//!   extraction, surrogate-key encoding and fact projection
//! - **frame**: output tables paired with their star-schema identity

pub mod builder;
pub mod error;
pub mod frame;
pub mod frame_utils;
pub mod normalize;
pub mod reshape;

pub use builder::{
    BuildReport, ImputationOutcome, NormalizedTables, StarSchema, StarSchemaBuilder,
    load_normalized_tables,
};
pub use error::{Result, TransformError};
pub use frame::StarFrame;
pub use normalize::{capitalize_column_name, normalize_internet, normalize_suicide};
pub use reshape::reshape_gdp;
