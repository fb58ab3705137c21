//! Column normalizers for the internet-usage and suicide sources.
//!
//! Neither source needs a structural reshape. The normalizers rename columns
//! to the canonical vocabulary, prune what is out of scope and give each
//! column the type the star-schema builder expects.

use polars::prelude::{DataFrame, DataType};
use tracing::{debug, info, warn};

use cstat_model::columns::{
    CODE, COUNTRY, NUMBER_OF_INTERNET_USERS, POPULATION, SUICIDES_NUMBER, YEAR, internet_raw,
    suicide_raw,
};

use crate::error::Result;
use crate::frame_utils::{cast_column, null_column, require_frame_columns};

/// Upper-case the first character of a column name and lower-case the rest.
///
/// ```
/// use cstat_transform::capitalize_column_name;
///
/// assert_eq!(capitalize_column_name("suicides_number"), "Suicides_number");
/// assert_eq!(capitalize_column_name("HDI for year"), "Hdi for year");
/// assert_eq!(capitalize_column_name(""), "");
/// ```
pub fn capitalize_column_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalize the internet-usage table.
///
/// Output columns: `Country`, `Code`, `Year`, `Number_of_internet_users`.
/// The entity label becomes `Country` and the user count becomes
/// `Number_of_internet_users`. A missing `Code` column is tolerated and
/// filled with nulls; rows are never filtered.
pub fn normalize_internet(raw: &DataFrame) -> Result<DataFrame> {
    require_frame_columns(
        raw,
        "internet",
        &[internet_raw::ENTITY, internet_raw::YEAR, internet_raw::USERS],
    )?;

    let mut df = raw.clone();
    df.rename(internet_raw::ENTITY, COUNTRY.into())?;
    df.rename(internet_raw::USERS, NUMBER_OF_INTERNET_USERS.into())?;
    if df.get_column_index(internet_raw::CODE).is_none() {
        warn!("internet usage table has no Code column; country codes will be missing");
        df.with_column(null_column(CODE, df.height(), &DataType::String))?;
    }

    cast_column(&mut df, COUNTRY, &DataType::String)?;
    cast_column(&mut df, CODE, &DataType::String)?;
    cast_column(&mut df, YEAR, &DataType::Int64)?;
    cast_column(&mut df, NUMBER_OF_INTERNET_USERS, &DataType::Float64)?;

    let df = df.select([COUNTRY, CODE, YEAR, NUMBER_OF_INTERNET_USERS])?;
    info!(rows = df.height(), "internet usage normalized");
    Ok(df)
}

/// Normalize the suicide-statistics table.
///
/// Drops the composite `country-year` key and the GDP, HDI and
/// per-100k columns, renames `suicides_no` and `country`, then capitalizes
/// every remaining column name. Columns outside the known set are kept
/// (capitalized) in their source position.
pub fn normalize_suicide(raw: &DataFrame) -> Result<DataFrame> {
    require_frame_columns(raw, "suicide", &suicide_raw::REQUIRED)?;

    let mut df = raw.clone();
    for column in suicide_raw::DROPPED {
        if df.get_column_index(column).is_some() {
            df.drop_in_place(column)?;
        } else {
            debug!(column, "suicide column scheduled for dropping is absent");
        }
    }

    df.rename(suicide_raw::SUICIDES_NO, suicide_raw::SUICIDES_NUMBER.into())?;
    df.rename(suicide_raw::COUNTRY, COUNTRY.into())?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| capitalize_column_name(name))
        .collect();
    df.set_column_names(names.iter().map(String::as_str))?;

    cast_column(&mut df, YEAR, &DataType::Int64)?;
    cast_column(&mut df, SUICIDES_NUMBER, &DataType::Int64)?;
    cast_column(&mut df, POPULATION, &DataType::Float64)?;

    info!(rows = df.height(), columns = df.width(), "suicide records normalized");
    Ok(df)
}
