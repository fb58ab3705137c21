//! Star-schema builder.
//!
//! Consumes the three normalized tables and produces the five dimension tables
//! and two fact tables. Each stage lives in its own module and is a plain
//! function over DataFrames:
//!
//! - **prepare**: schema checks, typing and key-uniqueness checks on the inputs
//! - **merge**: GDP/suicide outer join, population aggregation, internet join
//! - **population**: zero-total imputation
//! - **metrics**: population share and per-cohort internet users
//! - **dimension**: dimension extraction and surrogate keys
//! - **facts**: key encoding and fact projection

pub mod dimension;
pub mod facts;
pub mod merge;
pub mod metrics;
pub mod population;
pub mod prepare;

use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use cstat_ingest::{StagedOutput, read_csv_frame, read_csv_headers, require_columns};
use cstat_model::columns::{AGE, normalized};
use cstat_model::{ImputationPolicy, PipelineConfig, StarTable};

use crate::error::Result;
use crate::frame::StarFrame;

pub use dimension::{Dimension, Dimensions};
pub use population::ImputationOutcome;

/// The normalized GDP, internet-usage and suicide tables.
#[derive(Debug, Clone)]
pub struct NormalizedTables {
    pub gdp: DataFrame,
    pub internet: DataFrame,
    pub suicide: DataFrame,
}

/// Load the three normalized files.
///
/// All headers are checked before any file is loaded, so a schema problem in
/// any input is reported with its file path and nothing else is read.
pub fn load_normalized_tables(
    gdp: &Path,
    internet: &Path,
    suicide: &Path,
    delimiter: u8,
) -> Result<NormalizedTables> {
    let inputs: [(&Path, &[&str]); 3] = [
        (gdp, &normalized::GDP_REQUIRED),
        (internet, &normalized::INTERNET_REQUIRED),
        (suicide, &normalized::SUICIDE_REQUIRED),
    ];
    for (path, required) in inputs {
        let headers = read_csv_headers(path, delimiter)?;
        require_columns(&headers, required, path)?;
    }
    Ok(NormalizedTables {
        gdp: read_csv_frame(gdp, delimiter)?,
        internet: read_csv_frame(internet, delimiter)?,
        suicide: read_csv_frame(suicide, delimiter)?,
    })
}

/// Row counts and imputation results of one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Cohort rows after all joins.
    pub merged_rows: usize,
    /// Records per output table, in write order.
    pub tables: Vec<(StarTable, usize)>,
    pub imputation: ImputationOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StarSchemaBuilder {
    imputation: ImputationPolicy,
}

impl StarSchemaBuilder {
    pub fn new(imputation: ImputationPolicy) -> Self {
        Self { imputation }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.imputation)
    }

    /// Run every builder stage over `tables`.
    pub fn build(&self, tables: NormalizedTables) -> Result<StarSchema> {
        let start = Instant::now();

        let (gdp, internet, suicide) = info_span!("prepare").in_scope(|| -> Result<_> {
            Ok((
                prepare::prepare_gdp(tables.gdp)?,
                prepare::prepare_internet(tables.internet)?,
                prepare::prepare_suicide(tables.suicide)?,
            ))
        })?;
        debug!(
            gdp_rows = gdp.height(),
            internet_rows = internet.height(),
            suicide_rows = suicide.height(),
            "inputs prepared"
        );

        let (merged, imputation) = info_span!("population").in_scope(|| -> Result<_> {
            let merged = merge::merge_gdp_suicide(&gdp, &suicide)?;
            let totals = merge::aggregate_population(&merged)?;
            debug!(
                merged_rows = merged.height(),
                groups = totals.height(),
                "population aggregated"
            );
            let (totals, outcome) = population::impute_population(totals, self.imputation)?;
            let merged = merge::attach_totals(&merged, &totals)?;
            Ok((merged, outcome))
        })?;

        let merged = info_span!("metrics").in_scope(|| -> Result<_> {
            let merged = metrics::with_population_share(&merged)?;
            let merged = merge::attach_internet(&merged, &internet)?;
            metrics::with_internet_users(&merged)
        })?;

        let (dimensions, encoded) = info_span!("dimensions").in_scope(|| -> Result<_> {
            let dimensions = Dimensions::extract(&merged, AGE)?;
            let encoded = facts::encode_keys(&merged, &dimensions)?;
            Ok((dimensions, encoded))
        })?;

        let mut frames = Vec::with_capacity(StarTable::ALL.len());
        for table in StarTable::ALL {
            let data = match table {
                StarTable::Generations => dimensions.generation_frame()?,
                StarTable::Years => dimensions.year_frame()?,
                StarTable::Sexes => dimensions.sex_frame()?,
                StarTable::Countries => dimensions.country_frame()?,
                StarTable::AgeCategories => dimensions.age_category_frame()?,
                StarTable::PeopleDependingFacts | StarTable::CountryDependingFacts => {
                    facts::project(&encoded, table)?
                }
            };
            frames.push(StarFrame::new(table, data));
        }

        let report = BuildReport {
            merged_rows: merged.height(),
            tables: frames
                .iter()
                .map(|frame| (frame.table, frame.record_count()))
                .collect(),
            imputation,
        };
        info!(
            merged_rows = report.merged_rows,
            countries = dimensions.countries.countries.len(),
            years = dimensions.years.len(),
            imputed_groups = report.imputation.imputed_groups,
            duration_ms = start.elapsed().as_millis(),
            "star schema built"
        );
        Ok(StarSchema { frames, report })
    }
}

/// The seven output tables of one build.
#[derive(Debug, Clone)]
pub struct StarSchema {
    frames: Vec<StarFrame>,
    report: BuildReport,
}

impl StarSchema {
    /// Tables in write order.
    pub fn frames(&self) -> &[StarFrame] {
        &self.frames
    }

    pub fn frame(&self, table: StarTable) -> Option<&StarFrame> {
        self.frames.iter().find(|frame| frame.table == table)
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Write all tables into `output_dir` as one batch.
    ///
    /// Files are staged first and moved into place only after every table was
    /// written; on error the directory keeps its previous contents.
    pub fn write(&self, output_dir: &Path, delimiter: u8) -> Result<Vec<PathBuf>> {
        let mut batch = StagedOutput::new(output_dir, delimiter)?;
        for frame in &self.frames {
            let rows = batch.stage(frame.file_name(), &frame.data)?;
            debug!(table = %frame.table, rows, "table staged");
        }
        Ok(batch.commit()?)
    }
}
