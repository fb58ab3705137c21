//! Fact-table projection.
//!
//! Natural dimension values are replaced by surrogate keys, then each fact
//! table keeps exactly its declared columns in declared order. `Code` never
//! reaches a fact table.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use cstat_model::StarTable;
use cstat_model::columns::{AGE, AGE_CATEGORY, COUNTRY, GENERATION, SEX, YEAR};

use crate::builder::dimension::{Dimensions, encode_text_column};
use crate::error::Result;

/// Swap the five natural columns for their keys and rename `Age`.
pub fn encode_keys(merged: &DataFrame, dimensions: &Dimensions) -> Result<DataFrame> {
    let mut encoded = merged.clone();

    let countries = encode_text_column(
        &dimensions.countries.countries,
        COUNTRY,
        merged.column(COUNTRY)?.str()?,
    );
    let year_keys: Vec<Option<u32>> = merged
        .column(YEAR)?
        .i64()?
        .into_iter()
        .map(|year| year.and_then(|y| dimensions.years.key_of(&y)))
        .collect();
    let years = Series::new(YEAR.into(), year_keys).into_column();
    let sexes = encode_text_column(&dimensions.sexes, SEX, merged.column(SEX)?.str()?);
    let ages = encode_text_column(&dimensions.age_categories, AGE, merged.column(AGE)?.str()?);
    let generations = encode_text_column(
        &dimensions.generations,
        GENERATION,
        merged.column(GENERATION)?.str()?,
    );

    for column in [countries, years, sexes, ages, generations] {
        encoded.with_column(column)?;
    }
    encoded.rename(AGE, AGE_CATEGORY.into())?;
    Ok(encoded)
}

/// Keep the declared columns of `table`.
pub fn project(encoded: &DataFrame, table: StarTable) -> Result<DataFrame> {
    Ok(encoded.select(table.columns().iter().copied())?)
}
