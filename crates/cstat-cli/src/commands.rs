use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info_span};

use cstat_cli::pipeline::{
    BuildOutput, NormalizedPaths, RunOutput, StageOutput, build_star_schema, normalize_source,
    run_pipeline,
};
use cstat_ingest::LocalDirectory;
use cstat_model::config::delimiter_byte;
use cstat_model::{InputPaths, PipelineConfig, SourceDataset};
use cstat_transform::StarSchemaBuilder;

use crate::cli::{BuildArgs, GdpArgs, RunArgs, StageArgs};

pub fn run_gdp(args: &GdpArgs) -> Result<StageOutput> {
    run_stage(SourceDataset::Gdp, &args.stage, &args.drop_years)
}

pub fn run_internet(args: &StageArgs) -> Result<StageOutput> {
    run_stage(SourceDataset::Internet, args, &[])
}

pub fn run_suicide(args: &StageArgs) -> Result<StageOutput> {
    run_stage(SourceDataset::Suicide, args, &[])
}

fn run_stage(dataset: SourceDataset, args: &StageArgs, dropped_years: &[i64]) -> Result<StageOutput> {
    let delimiter = delimiter_byte(args.delimiter)?;
    normalize_source(dataset, &args.input, &args.output, delimiter, dropped_years)
}

pub fn run_build(args: &BuildArgs) -> Result<BuildOutput> {
    let delimiter = delimiter_byte(args.delimiter)?;
    let inputs = NormalizedPaths {
        gdp: args.gdp.clone(),
        internet: args.internet.clone(),
        suicide: args.suicide.clone(),
    };
    let builder = StarSchemaBuilder::new(args.imputation.into());
    build_star_schema(&inputs, &args.output_dir, builder, delimiter)
}

pub fn run_all(args: &RunArgs) -> Result<RunOutput> {
    let config = resolve_config(args)?;
    let span = info_span!("run");
    let _guard = span.enter();
    debug!(?config, "resolved configuration");
    run_pipeline(&config, &LocalDirectory)
}

/// Merge the optional config file with command-line overrides.
fn resolve_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => PipelineConfig::new(
            InputPaths {
                gdp: required(&args.gdp, "--gdp")?,
                internet: required(&args.internet, "--internet")?,
                suicide: required(&args.suicide, "--suicide")?,
            },
            required(&args.processing_dir, "--processing-dir")?,
            required(&args.output_dir, "--output-dir")?,
        ),
    };
    if let Some(path) = &args.gdp {
        config.inputs.gdp = path.clone();
    }
    if let Some(path) = &args.internet {
        config.inputs.internet = path.clone();
    }
    if let Some(path) = &args.suicide {
        config.inputs.suicide = path.clone();
    }
    if let Some(dir) = &args.processing_dir {
        config.processing_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(policy) = args.imputation {
        config = config.with_imputation(policy.into());
    }
    if let Some(delimiter) = args.delimiter {
        config = config.with_delimiter(delimiter);
    }
    if !args.drop_years.is_empty() {
        config = config.with_dropped_gdp_years(args.drop_years.clone());
    }
    config.validate()?;
    Ok(config)
}

fn required(value: &Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or_else(|| anyhow!("{flag} is required when no --config file is given"))
}
