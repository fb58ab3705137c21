//! Star-schema output tables.
//!
//! Each table knows its file name, the destination table a loader copies it
//! into, and its declared column order. The loader truncates the destination
//! and bulk-loads the file with the header skipped, so the file's column order
//! (after the leading `id`) must match [`StarTable::columns`] exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::columns::{
    AGE_CATEGORY, CENTURY, CODE, COUNTRY, DECADE, GDP, GENERATION, NUMBER_OF_INTERNET_USERS,
    NUMBER_OF_PEOPLE, PERCENTAGE_OF_POPULATION, SEX, SUICIDES_NUMBER,
    TOTAL_NUMBER_OF_INTERNET_USERS, TOTAL_POPULATION, YEAR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Dimension,
    Fact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarTable {
    Generations,
    Years,
    Sexes,
    Countries,
    AgeCategories,
    PeopleDependingFacts,
    CountryDependingFacts,
}

impl StarTable {
    /// All tables in the order they are written.
    pub const ALL: [StarTable; 7] = [
        Self::Generations,
        Self::Years,
        Self::Sexes,
        Self::Countries,
        Self::AgeCategories,
        Self::PeopleDependingFacts,
        Self::CountryDependingFacts,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Generations => "generations.csv",
            Self::Years => "years.csv",
            Self::Sexes => "sexes.csv",
            Self::Countries => "countries.csv",
            Self::AgeCategories => "age_categories.csv",
            Self::PeopleDependingFacts => "people_depending_facts.csv",
            Self::CountryDependingFacts => "country_depending_facts.csv",
        }
    }

    /// Relational table the file is loaded into.
    pub fn destination_table(self) -> &'static str {
        match self {
            Self::Generations => "generation",
            Self::Years => "year",
            Self::Sexes => "sex",
            Self::Countries => "country",
            Self::AgeCategories => "ages",
            Self::PeopleDependingFacts => "people_depending_facts",
            Self::CountryDependingFacts => "country_depending_facts",
        }
    }

    pub fn kind(self) -> TableKind {
        match self {
            Self::PeopleDependingFacts | Self::CountryDependingFacts => TableKind::Fact,
            _ => TableKind::Dimension,
        }
    }

    /// Declared columns, excluding the leading `id` index column.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Generations => &[GENERATION],
            Self::Years => &[YEAR, CENTURY, DECADE],
            Self::Sexes => &[SEX],
            Self::Countries => &[COUNTRY, CODE],
            Self::AgeCategories => &[AGE_CATEGORY],
            Self::PeopleDependingFacts => &[
                COUNTRY,
                YEAR,
                SEX,
                AGE_CATEGORY,
                SUICIDES_NUMBER,
                NUMBER_OF_PEOPLE,
                GENERATION,
                PERCENTAGE_OF_POPULATION,
                NUMBER_OF_INTERNET_USERS,
            ],
            Self::CountryDependingFacts => &[
                COUNTRY,
                YEAR,
                GDP,
                TOTAL_POPULATION,
                TOTAL_NUMBER_OF_INTERNET_USERS,
            ],
        }
    }

    /// Load stage: dimensions share stage 0, then people facts, then country facts.
    pub fn load_order(self) -> u8 {
        match self {
            Self::PeopleDependingFacts => 1,
            Self::CountryDependingFacts => 2,
            _ => 0,
        }
    }

    /// Tables sorted by load stage, stable within a stage.
    pub fn in_load_order() -> Vec<StarTable> {
        let mut tables = Self::ALL.to_vec();
        tables.sort_by_key(|table| table.load_order());
        tables
    }
}

impl fmt::Display for StarTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.destination_table())
    }
}
