//! End-to-end runs over small raw files.

use std::fs;
use std::path::Path;

use cstat_cli::pipeline::{NormalizedPaths, build_star_schema, normalize_source, run_pipeline};
use cstat_ingest::{IngestError, LocalDirectory, read_csv_headers};
use cstat_model::{ImputationPolicy, InputPaths, PipelineConfig, SourceDataset, StarTable};
use cstat_transform::StarSchemaBuilder;

const GDP_RAW: &str = "\
Country ,Country Code,Indicator Name,Indicator Code,1995,1996,2019
Chad,TCD,GDP per capita (current US$),NY.GDP.PCAP.CD,220.5,231.0,700.1
Chile,CHL,GDP per capita (current US$),NY.GDP.PCAP.CD,5100.0,,15000.2
";

const INTERNET_RAW: &str = "\
Entity,Code,Year,Number of internet users (OWID based on WB & UN)
Chad,TCD,1995,40
Chile,CHL,1995,2000
Chile,CHL,1996,3500
";

const SUICIDE_RAW: &str = "\
country,year,sex,age,suicides_no,population,suicides/100k pop,country-year,HDI for year, gdp_for_year ($) ,gdp_per_capita ($),generation
Chad,1995,male,15-24 years,1,400,0.25,Chad1995,,\"1,000\",220,Millenials
Chad,1995,female,15-24 years,2,600,0.33,Chad1995,,\"1,000\",220,Millenials
Chile,1995,male,75+ years,5,8000,0.06,Chile1995,0.7,\"9,000\",5100,G.I. Generation
Chile,1996,male,75+ years,4,0,0,Chile1996,0.7,\"9,500\",5200,G.I. Generation
";

fn write_raw(dir: &Path) -> InputPaths {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).unwrap();
    let inputs = InputPaths {
        gdp: raw.join("gdp_per_capita.csv"),
        internet: raw.join("internet_usage.csv"),
        suicide: raw.join("master.csv"),
    };
    fs::write(&inputs.gdp, GDP_RAW).unwrap();
    fs::write(&inputs.internet, INTERNET_RAW).unwrap();
    fs::write(&inputs.suicide, SUICIDE_RAW).unwrap();
    inputs
}

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig::new(
        write_raw(dir),
        dir.join("processing"),
        dir.join("warehouse"),
    )
}

#[test]
fn run_writes_normalized_files_and_star_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let run = run_pipeline(&config, &LocalDirectory).unwrap();

    assert_eq!(run.stages.len(), 3);
    for stage in &run.stages {
        assert!(stage.path.is_file(), "{} not written", stage.path.display());
        let headers = read_csv_headers(&stage.path, b',').unwrap();
        assert_eq!(headers[0], "id");
    }
    assert_eq!(run.build.written.len(), StarTable::ALL.len());
    for table in StarTable::ALL {
        assert!(config.output_dir.join(table.file_name()).is_file());
    }
}

#[test]
fn gdp_stage_drops_configured_year() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = write_raw(dir.path());
    let output = dir.path().join("processing").join("gdp.csv");

    let stage = normalize_source(SourceDataset::Gdp, &inputs.gdp, &output, b',', &[2019]).unwrap();

    // Two countries by two kept years.
    assert_eq!(stage.data.height(), 4);
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("id,Country,Year,GDP\n"));
    assert!(!written.contains("2019"));
}

#[test]
fn build_stage_reads_back_normalized_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let normalized = NormalizedPaths::in_dir(&config.processing_dir);
    for (dataset, raw, output) in [
        (SourceDataset::Gdp, &config.inputs.gdp, &normalized.gdp),
        (SourceDataset::Internet, &config.inputs.internet, &normalized.internet),
        (SourceDataset::Suicide, &config.inputs.suicide, &normalized.suicide),
    ] {
        normalize_source(dataset, raw, output, b',', &config.dropped_gdp_years).unwrap();
    }

    let build = build_star_schema(
        &normalized,
        &config.output_dir,
        StarSchemaBuilder::new(ImputationPolicy::CountryMean),
        b',',
    )
    .unwrap();

    let countries = fs::read_to_string(config.output_dir.join("countries.csv")).unwrap();
    insta::assert_snapshot!(countries.trim_end(), @r"
    id,Country,Code
    0,Chad,TCD
    1,Chile,CHL
    ");
    // Chile 1996 reports a zero population and Chad 1996 only has GDP data.
    assert_eq!(build.schema.report().imputation.imputed_groups, 2);
    assert_eq!(build.schema.report().imputation.undefined_groups, 0);
}

#[test]
fn missing_raw_file_is_reported_before_any_stage() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.inputs.internet = dir.path().join("raw").join("absent.csv");

    let err = run_pipeline(&config, &LocalDirectory).unwrap_err();

    assert!(err.chain().any(|cause| matches!(
        cause.downcast_ref::<IngestError>(),
        Some(IngestError::DatasetUnavailable {
            dataset: SourceDataset::Internet,
            ..
        })
    )));
    assert!(!config.processing_dir.exists());
    assert!(!config.output_dir.exists());
}

#[test]
fn missing_raw_column_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.inputs.suicide, "country,year,sex,age,population,generation\n").unwrap();

    let err = run_pipeline(&config, &LocalDirectory).unwrap_err();

    assert!(err.chain().any(|cause| matches!(
        cause.downcast_ref::<IngestError>(),
        Some(IngestError::MissingColumn { column, .. }) if column == "suicides_no"
    )));
    assert!(!config.output_dir.exists());
}

#[test]
fn run_follows_configured_policy_and_years() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path())
        .with_imputation(ImputationPolicy::None)
        .with_dropped_gdp_years(Vec::new());

    let run = run_pipeline(&config, &LocalDirectory).unwrap();

    let gdp = run
        .stages
        .iter()
        .find(|stage| stage.dataset == SourceDataset::Gdp)
        .unwrap();
    // 2019 is kept, so three years per country.
    assert_eq!(gdp.data.height(), 6);
    assert_eq!(run.build.schema.report().imputation.imputed_groups, 0);
}
