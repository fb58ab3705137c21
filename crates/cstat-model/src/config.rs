//! Pipeline configuration.
//!
//! Every path and policy the pipeline needs is carried explicitly in a
//! [`PipelineConfig`]; nothing is read from ambient globals.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How zero population totals are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationPolicy {
    /// Replace a zero (Country, Year) total with the mean of that country's
    /// non-zero totals. Countries without any non-zero total stay missing.
    #[default]
    CountryMean,
    /// Keep zero totals as observed.
    None,
}

/// Raw source files, one per dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub gdp: PathBuf,
    pub internet: PathBuf,
    pub suicide: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub inputs: InputPaths,
    /// Directory receiving the normalized per-source tables.
    pub processing_dir: PathBuf,
    /// Directory receiving the seven star-schema tables.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub imputation: ImputationPolicy,
    /// Year columns discarded from the GDP file before reshaping.
    #[serde(default = "default_dropped_gdp_years")]
    pub dropped_gdp_years: Vec<i64>,
    /// Delimiter of every file the pipeline writes (and reads back).
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_dropped_gdp_years() -> Vec<i64> {
    vec![2019]
}

fn default_delimiter() -> char {
    ','
}

impl PipelineConfig {
    pub fn new(inputs: InputPaths, processing_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            inputs,
            processing_dir,
            output_dir,
            imputation: ImputationPolicy::default(),
            dropped_gdp_years: default_dropped_gdp_years(),
            delimiter: default_delimiter(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_imputation(mut self, policy: ImputationPolicy) -> Self {
        self.imputation = policy;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_dropped_gdp_years(mut self, years: Vec<i64>) -> Self {
        self.dropped_gdp_years = years;
        self
    }

    /// Delimiter as the single byte the CSV layers expect.
    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        let inputs = [
            ("gdp", &self.inputs.gdp),
            ("internet", &self.inputs.internet),
            ("suicide", &self.inputs.suicide),
        ];
        for (idx, (first, left)) in inputs.iter().enumerate() {
            for (second, right) in inputs.iter().skip(idx + 1) {
                if left == right {
                    return Err(ConfigError::SharedInput {
                        first: *first,
                        second: *second,
                        path: left.to_path_buf(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Convert a delimiter character into a byte, rejecting anything non-ASCII.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '\n' && delimiter != '\r' && delimiter != '"' {
        Ok(delimiter as u8)
    } else {
        Err(ConfigError::InvalidDelimiter(delimiter.to_string()))
    }
}
