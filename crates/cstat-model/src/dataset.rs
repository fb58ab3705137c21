//! Raw source datasets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three independently sourced datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDataset {
    /// Per-country GDP in wide (one column per year) form.
    Gdp,
    /// Per-country-per-year internet users.
    Internet,
    /// Per-country-per-year-per-cohort suicide counts.
    Suicide,
}

impl SourceDataset {
    pub const ALL: [SourceDataset; 3] = [Self::Gdp, Self::Internet, Self::Suicide];

    /// Identifier of the dataset in the remote catalogue.
    pub fn catalogue_id(self) -> &'static str {
        match self {
            Self::Gdp => "nitishabharathi/gdp-per-capita-all-countries",
            Self::Internet => "pavan9065/internet-usage",
            Self::Suicide => "russellyates88/suicide-rates-overview-1985-to-2016",
        }
    }

    /// Staging table the normalized file is bulk-loaded into.
    pub fn staging_table(self) -> &'static str {
        match self {
            Self::Gdp => "country_data_raw",
            Self::Internet => "internet_usage_data_raw",
            Self::Suicide => "suicide_data_raw",
        }
    }

    /// File name of the normalized table inside the processing directory.
    pub fn normalized_file_name(self) -> &'static str {
        match self {
            Self::Gdp => "gdp.csv",
            Self::Internet => "internet_usage.csv",
            Self::Suicide => "suicide.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gdp => "gdp",
            Self::Internet => "internet",
            Self::Suicide => "suicide",
        }
    }
}

impl fmt::Display for SourceDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
