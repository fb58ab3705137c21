//! Schema checks and typing of the normalized tables.
//!
//! Normalized tables usually come back from delimited files, so every column
//! arrives as a string and an `id` index column may lead. These functions drop
//! the index, verify the required columns and cast each column to the type the
//! merge stages rely on.

use std::collections::HashSet;

use polars::prelude::{DataFrame, DataType};
use tracing::warn;

use cstat_model::columns::{
    AGE, CODE, COUNTRY, GDP, GENERATION, NUMBER_OF_INTERNET_USERS, POPULATION, SEX,
    SUICIDES_NUMBER, YEAR, normalized,
};

use crate::error::{Result, TransformError};
use crate::frame_utils::{cast_column, drop_index_column, null_column, require_frame_columns};

pub fn prepare_gdp(mut df: DataFrame) -> Result<DataFrame> {
    drop_index_column(&mut df)?;
    require_frame_columns(&df, "gdp", &normalized::GDP_REQUIRED)?;
    cast_column(&mut df, COUNTRY, &DataType::String)?;
    cast_column(&mut df, YEAR, &DataType::Int64)?;
    cast_column(&mut df, GDP, &DataType::Float64)?;
    let df = df.select(normalized::GDP_REQUIRED)?;
    ensure_unique_keys(&df, "gdp")?;
    Ok(df)
}

pub fn prepare_internet(mut df: DataFrame) -> Result<DataFrame> {
    drop_index_column(&mut df)?;
    require_frame_columns(&df, "internet", &normalized::INTERNET_REQUIRED)?;
    if df.get_column_index(CODE).is_none() {
        warn!("normalized internet table has no Code column");
        df.with_column(null_column(CODE, df.height(), &DataType::String))?;
    }
    cast_column(&mut df, COUNTRY, &DataType::String)?;
    cast_column(&mut df, CODE, &DataType::String)?;
    cast_column(&mut df, YEAR, &DataType::Int64)?;
    cast_column(&mut df, NUMBER_OF_INTERNET_USERS, &DataType::Float64)?;
    let df = df.select([COUNTRY, CODE, YEAR, NUMBER_OF_INTERNET_USERS])?;
    ensure_unique_keys(&df, "internet")?;
    Ok(df)
}

pub fn prepare_suicide(mut df: DataFrame) -> Result<DataFrame> {
    drop_index_column(&mut df)?;
    require_frame_columns(&df, "suicide", &normalized::SUICIDE_REQUIRED)?;
    for column in [COUNTRY, SEX, AGE, GENERATION] {
        cast_column(&mut df, column, &DataType::String)?;
    }
    cast_column(&mut df, YEAR, &DataType::Int64)?;
    cast_column(&mut df, SUICIDES_NUMBER, &DataType::Int64)?;
    cast_column(&mut df, POPULATION, &DataType::Float64)?;
    Ok(df.select(normalized::SUICIDE_REQUIRED)?)
}

/// Reject a table whose (Country, Year) pairs repeat.
///
/// GDP and internet rows are joined onto cohort rows by (Country, Year); a
/// repeated key would silently multiply those rows. Rows with a missing key
/// part never match in a join and are not checked.
pub fn ensure_unique_keys(df: &DataFrame, table: &'static str) -> Result<()> {
    let countries = df.column(COUNTRY)?.str()?;
    let years = df.column(YEAR)?.i64()?;
    let mut seen = HashSet::with_capacity(df.height());
    for (country, year) in countries.into_iter().zip(years.into_iter()) {
        let (Some(country), Some(year)) = (country, year) else {
            continue;
        };
        if !seen.insert((country, year)) {
            return Err(TransformError::DuplicateKey {
                table,
                country: country.to_string(),
                year,
            });
        }
    }
    Ok(())
}
