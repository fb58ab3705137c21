//! GDP wide-to-long reshaping.
//!
//! The raw GDP file has one row per country and one column per year. The
//! reshaper emits one `(Country, Year, GDP)` row per country and year column.
//! Each value is paired with the year parsed from its own column header, so
//! out-of-order or non-contiguous year columns cannot shift values onto the
//! wrong year.

use std::collections::HashSet;
use std::time::Instant;

use polars::prelude::{DataFrame, DataType, Float64Chunked, IntoColumn, NamedFrom, Series};
use tracing::{debug, info};

use cstat_ingest::parse_i64;
use cstat_model::columns::{COUNTRY, GDP, YEAR, gdp_raw};

use crate::error::{Result, TransformError};

/// A year column of the wide table, cast to floats.
struct YearColumn {
    year: i64,
    values: Float64Chunked,
}

/// Reshape the wide GDP table into long form.
///
/// The country column is matched on its trimmed header (the source file spells
/// it `Country `). Every header that parses as an integer is a year column;
/// years listed in `dropped_years` are discarded first. Other columns (country
/// code, indicator name and code) are ignored.
///
/// Output rows are country-major: all years of the first country in source
/// column order, then the next country. Cells that are empty or not numeric
/// become missing GDP values.
pub fn reshape_gdp(raw: &DataFrame, dropped_years: &[i64]) -> Result<DataFrame> {
    let start = Instant::now();

    let country_name = raw
        .get_column_names()
        .into_iter()
        .find(|name| name.trim() == gdp_raw::COUNTRY)
        .map(|name| name.to_string())
        .ok_or_else(|| TransformError::MissingColumn {
            table: "gdp",
            column: gdp_raw::COUNTRY.to_string(),
        })?;

    let year_columns = year_columns(raw, dropped_years)?;

    let countries_column = raw.column(&country_name)?.cast(&DataType::String)?;
    let countries = countries_column.str()?;

    let row_count = raw.height() * year_columns.len();
    let mut country_out: Vec<Option<&str>> = Vec::with_capacity(row_count);
    let mut year_out: Vec<i64> = Vec::with_capacity(row_count);
    let mut gdp_out: Vec<Option<f64>> = Vec::with_capacity(row_count);

    for (row, country) in countries.into_iter().enumerate() {
        for column in &year_columns {
            country_out.push(country);
            year_out.push(column.year);
            gdp_out.push(column.values.get(row));
        }
    }

    let long = DataFrame::new(vec![
        Series::new(COUNTRY.into(), country_out).into_column(),
        Series::new(YEAR.into(), year_out).into_column(),
        Series::new(GDP.into(), gdp_out).into_column(),
    ])?;

    info!(
        countries = raw.height(),
        years = year_columns.len(),
        rows = long.height(),
        duration_ms = start.elapsed().as_millis(),
        "GDP reshaped to long form"
    );
    Ok(long)
}

/// Collect the year columns in source order, skipping dropped years.
fn year_columns(raw: &DataFrame, dropped_years: &[i64]) -> Result<Vec<YearColumn>> {
    let mut seen = HashSet::new();
    let mut dropped_seen = HashSet::new();
    let mut columns = Vec::new();

    for column in raw.get_columns() {
        let Some(year) = parse_i64(column.name()) else {
            continue;
        };
        if dropped_years.contains(&year) {
            dropped_seen.insert(year);
            continue;
        }
        if !seen.insert(year) {
            return Err(TransformError::DuplicateYearColumn { year });
        }
        let values = column.cast(&DataType::Float64)?.f64()?.clone();
        columns.push(YearColumn { year, values });
    }

    for year in dropped_years {
        if dropped_seen.contains(year) {
            debug!(year, "dropped GDP year column");
        } else {
            debug!(year, "GDP year column configured for dropping is absent");
        }
    }

    if columns.is_empty() {
        return Err(TransformError::NoYearColumns);
    }
    Ok(columns)
}
