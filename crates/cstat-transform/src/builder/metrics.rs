//! Derived ratio and absolute metrics.

use polars::prelude::*;

use cstat_model::columns::{
    NUMBER_OF_INTERNET_USERS, NUMBER_OF_PEOPLE, PERCENTAGE_OF_POPULATION,
    TOTAL_NUMBER_OF_INTERNET_USERS, TOTAL_POPULATION,
};

use crate::error::Result;

/// `numerator / denominator`, null when the denominator is zero or missing.
fn guarded_ratio(numerator: &str, denominator: &str) -> Expr {
    when(col(denominator).neq(lit(0.0)))
        .then(col(numerator).cast(DataType::Float64) / col(denominator))
        .otherwise(lit(NULL).cast(DataType::Float64))
}

/// Add `Percentage_of_population = Number_of_people / Total_population`.
pub fn with_population_share(df: &DataFrame) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .with_column(guarded_ratio(NUMBER_OF_PEOPLE, TOTAL_POPULATION).alias(PERCENTAGE_OF_POPULATION))
        .collect()?)
}

/// Add the per-cohort estimate
/// `Number_of_internet_users = Percentage_of_population * Total_number_of_internet_users`.
pub fn with_internet_users(df: &DataFrame) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .with_column(
            (col(PERCENTAGE_OF_POPULATION) * col(TOTAL_NUMBER_OF_INTERNET_USERS))
                .alias(NUMBER_OF_INTERNET_USERS),
        )
        .collect()?)
}
