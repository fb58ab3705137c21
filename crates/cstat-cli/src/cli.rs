//! CLI argument definitions for `cstat`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cstat_model::ImputationPolicy;

#[derive(Parser)]
#[command(
    name = "cstat",
    version,
    about = "Country statistics warehouse - build a star schema from GDP, internet and suicide data",
    long_about = "Reshape and normalize three country-level datasets and build a star schema:\n\
                  five dimension tables (generation, year, sex, country, age category) and\n\
                  two fact tables keyed by compact surrogate integers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reshape the wide GDP file into one row per country and year.
    Gdp(GdpArgs),

    /// Normalize the internet-usage file.
    Internet(StageArgs),

    /// Prune and normalize the suicide-statistics file.
    Suicide(StageArgs),

    /// Build the star schema from the three normalized files.
    Build(BuildArgs),

    /// Run every stage: normalize the raw files, then build the star schema.
    Run(RunArgs),

    /// List the output tables with their destination table and load order.
    Tables,
}

#[derive(Args)]
pub struct StageArgs {
    /// Raw source file (comma separated, header row required).
    #[arg(value_name = "RAW")]
    pub input: PathBuf,

    /// Normalized output file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Delimiter of the output file.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Print the first N rows of the produced table.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Args)]
pub struct GdpArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Year column to discard before reshaping (repeatable).
    #[arg(long = "drop-year", value_name = "YEAR", default_values_t = [2019])]
    pub drop_years: Vec<i64>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Normalized GDP file.
    #[arg(long = "gdp", value_name = "FILE")]
    pub gdp: PathBuf,

    /// Normalized internet-usage file.
    #[arg(long = "internet", value_name = "FILE")]
    pub internet: PathBuf,

    /// Normalized suicide file.
    #[arg(long = "suicide", value_name = "FILE")]
    pub suicide: PathBuf,

    /// Directory receiving the seven star-schema tables.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// How zero population totals are treated.
    #[arg(long = "imputation", value_enum, default_value = "country-mean")]
    pub imputation: ImputationArg,

    /// Delimiter of the normalized inputs and of the outputs.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Print the first N rows of every output table.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Args)]
pub struct RunArgs {
    /// JSON pipeline configuration. Flags below override its values.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raw GDP file.
    #[arg(long = "gdp", value_name = "FILE")]
    pub gdp: Option<PathBuf>,

    /// Raw internet-usage file.
    #[arg(long = "internet", value_name = "FILE")]
    pub internet: Option<PathBuf>,

    /// Raw suicide-statistics file.
    #[arg(long = "suicide", value_name = "FILE")]
    pub suicide: Option<PathBuf>,

    /// Directory receiving the normalized per-source files.
    #[arg(long = "processing-dir", value_name = "DIR")]
    pub processing_dir: Option<PathBuf>,

    /// Directory receiving the seven star-schema tables.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long = "imputation", value_enum)]
    pub imputation: Option<ImputationArg>,

    #[arg(long = "delimiter")]
    pub delimiter: Option<char>,

    /// GDP year column to discard (repeatable; replaces the configured list).
    #[arg(long = "drop-year", value_name = "YEAR")]
    pub drop_years: Vec<i64>,

    /// Print the first N rows of every produced table.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImputationArg {
    /// Replace zero totals with the country's mean non-zero total.
    CountryMean,
    /// Keep zero totals.
    None,
}

impl From<ImputationArg> for ImputationPolicy {
    fn from(arg: ImputationArg) -> Self {
        match arg {
            ImputationArg::CountryMean => ImputationPolicy::CountryMean,
            ImputationArg::None => ImputationPolicy::None,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
