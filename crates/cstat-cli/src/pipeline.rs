//! File-to-file pipeline stages.
//!
//! Each normalizer reads one raw file and writes one `id`-indexed normalized
//! file; the builder reads the three normalized files back and writes the
//! seven star-schema tables as one batch. [`run_pipeline`] chains them in the
//! fixed order a scheduler would.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use cstat_ingest::{
    DatasetFetcher, read_csv_frame, read_csv_headers, require_columns, write_indexed_csv,
};
use cstat_model::columns::{internet_raw, suicide_raw};
use cstat_model::{PipelineConfig, SourceDataset};
use cstat_transform::{
    StarSchema, StarSchemaBuilder, load_normalized_tables, normalize_internet, normalize_suicide,
    reshape_gdp,
};

/// Raw source files are always comma separated.
pub const RAW_DELIMITER: u8 = b',';

/// A normalized source table and where it was written.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub dataset: SourceDataset,
    pub path: PathBuf,
    pub data: DataFrame,
}

/// Normalize one raw source file into `output`.
///
/// `dropped_gdp_years` only applies to the GDP dataset.
pub fn normalize_source(
    dataset: SourceDataset,
    raw: &Path,
    output: &Path,
    delimiter: u8,
    dropped_gdp_years: &[i64],
) -> Result<StageOutput> {
    let span = info_span!("normalize", dataset = %dataset);
    let _guard = span.enter();
    let start = Instant::now();

    let headers = read_csv_headers(raw, RAW_DELIMITER)
        .with_context(|| format!("read {dataset} headers"))?;
    match dataset {
        SourceDataset::Gdp => {}
        SourceDataset::Internet => require_columns(
            &headers,
            &[internet_raw::ENTITY, internet_raw::YEAR, internet_raw::USERS],
            raw,
        )?,
        SourceDataset::Suicide => require_columns(&headers, &suicide_raw::REQUIRED, raw)?,
    }

    let frame = read_csv_frame(raw, RAW_DELIMITER).with_context(|| format!("load {dataset}"))?;
    let data = match dataset {
        SourceDataset::Gdp => reshape_gdp(&frame, dropped_gdp_years),
        SourceDataset::Internet => normalize_internet(&frame),
        SourceDataset::Suicide => normalize_suicide(&frame),
    }
    .with_context(|| format!("normalize {dataset} from {}", raw.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    write_indexed_csv(&data, output, delimiter)
        .with_context(|| format!("write {}", output.display()))?;

    info!(
        dataset = %dataset,
        staging_table = dataset.staging_table(),
        source_file = %raw.display(),
        output_file = %output.display(),
        rows = data.height(),
        duration_ms = start.elapsed().as_millis(),
        "source normalized"
    );
    Ok(StageOutput {
        dataset,
        path: output.to_path_buf(),
        data,
    })
}

/// Paths of the three normalized files the builder consumes.
#[derive(Debug, Clone)]
pub struct NormalizedPaths {
    pub gdp: PathBuf,
    pub internet: PathBuf,
    pub suicide: PathBuf,
}

impl NormalizedPaths {
    /// Default file names inside a processing directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            gdp: dir.join(SourceDataset::Gdp.normalized_file_name()),
            internet: dir.join(SourceDataset::Internet.normalized_file_name()),
            suicide: dir.join(SourceDataset::Suicide.normalized_file_name()),
        }
    }
}

/// Result of the builder stage.
#[derive(Debug)]
pub struct BuildOutput {
    pub schema: StarSchema,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
}

/// Build the star schema from normalized files and write it to `output_dir`.
pub fn build_star_schema(
    inputs: &NormalizedPaths,
    output_dir: &Path,
    builder: StarSchemaBuilder,
    delimiter: u8,
) -> Result<BuildOutput> {
    let span = info_span!("build", output_dir = %output_dir.display());
    let _guard = span.enter();

    let tables = load_normalized_tables(&inputs.gdp, &inputs.internet, &inputs.suicide, delimiter)
        .context("load normalized tables")?;
    let schema = builder
        .build(tables)
        .context("build star schema")?;
    let written = schema
        .write(output_dir, delimiter)
        .with_context(|| format!("write star schema to {}", output_dir.display()))?;
    Ok(BuildOutput {
        schema,
        output_dir: output_dir.to_path_buf(),
        written,
    })
}

/// Everything one end-to-end run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub stages: Vec<StageOutput>,
    pub build: BuildOutput,
}

/// Run all four stages as configured.
///
/// Every raw dataset is checked with `fetcher` before any stage runs.
pub fn run_pipeline(config: &PipelineConfig, fetcher: &impl DatasetFetcher) -> Result<RunOutput> {
    let start = Instant::now();
    config.validate().context("invalid configuration")?;
    let delimiter = config.delimiter_byte()?;

    let raw_inputs = [
        (SourceDataset::Gdp, &config.inputs.gdp),
        (SourceDataset::Internet, &config.inputs.internet),
        (SourceDataset::Suicide, &config.inputs.suicide),
    ];
    for (dataset, path) in raw_inputs {
        fetcher
            .ensure_available(dataset, path)
            .with_context(|| format!("fetch {dataset}"))?;
    }

    let normalized = NormalizedPaths::in_dir(&config.processing_dir);
    let mut stages = Vec::with_capacity(raw_inputs.len());
    for (dataset, raw) in raw_inputs {
        let output = match dataset {
            SourceDataset::Gdp => &normalized.gdp,
            SourceDataset::Internet => &normalized.internet,
            SourceDataset::Suicide => &normalized.suicide,
        };
        stages.push(normalize_source(
            dataset,
            raw,
            output,
            delimiter,
            &config.dropped_gdp_years,
        )?);
    }

    let build = build_star_schema(
        &normalized,
        &config.output_dir,
        StarSchemaBuilder::from_config(config),
        delimiter,
    )?;
    info!(
        processing_dir = %config.processing_dir.display(),
        output_dir = %config.output_dir.display(),
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(RunOutput { stages, build })
}
