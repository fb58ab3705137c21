//! The three (Country, Year) joins of the builder.
//!
//! Row order after every join is pinned explicitly: the GDP/suicide merge is
//! sorted by (Country, Year) with suicide-file order kept inside a group, and
//! the later joins are re-sorted on the `__row` position recorded after it.
//! Dimension keys are assigned by first occurrence, so this order decides them.

use polars::prelude::*;

use cstat_model::columns::{
    COUNTRY, NUMBER_OF_INTERNET_USERS, NUMBER_OF_PEOPLE, POPULATION, TOTAL_NUMBER_OF_INTERNET_USERS,
    TOTAL_POPULATION, YEAR,
};

use crate::error::Result;

/// Position of a row in the merged GDP/suicide table.
pub const ROW: &str = "__row";
const SOURCE_ROW: &str = "__source_row";

fn country_year() -> [Expr; 2] {
    [col(COUNTRY), col(YEAR)]
}

fn in_row_order(lf: LazyFrame) -> LazyFrame {
    lf.sort_by_exprs(
        [col(ROW)],
        SortMultipleOptions::default().with_maintain_order(true),
    )
}

/// Outer-join GDP with suicide records on (Country, Year).
///
/// Country-years present in only one table are kept with nulls for the other
/// table's columns. The result carries a `__row` position column.
pub fn merge_gdp_suicide(gdp: &DataFrame, suicide: &DataFrame) -> Result<DataFrame> {
    let suicide = suicide.with_row_index(SOURCE_ROW.into(), None)?;
    let mut merged = gdp
        .clone()
        .lazy()
        .join(
            suicide.lazy(),
            country_year(),
            country_year(),
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .sort_by_exprs(
            [col(COUNTRY), col(YEAR), col(SOURCE_ROW)],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        )
        .collect()?;
    merged.drop_in_place(SOURCE_ROW)?;
    Ok(merged.with_row_index(ROW.into(), None)?)
}

/// Sum cohort populations per (Country, Year).
///
/// Groups whose cohorts carry no population at all (GDP-only country-years)
/// sum to zero, which makes them candidates for imputation.
pub fn aggregate_population(merged: &DataFrame) -> Result<DataFrame> {
    Ok(merged
        .clone()
        .lazy()
        .group_by_stable(country_year())
        .agg([col(POPULATION)
            .sum()
            .fill_null(lit(0.0))
            .alias(TOTAL_POPULATION)])
        .collect()?)
}

/// Inner-join the per-country-year totals back onto the cohort rows.
///
/// Rows with a missing Country or Year have no total and are dropped. The
/// cohort-level `Population` becomes `Number_of_people`.
pub fn attach_totals(merged: &DataFrame, totals: &DataFrame) -> Result<DataFrame> {
    let mut joined = in_row_order(merged.clone().lazy().join(
        totals.clone().lazy(),
        country_year(),
        country_year(),
        JoinArgs::new(JoinType::Inner),
    ))
    .collect()?;
    joined.rename(POPULATION, NUMBER_OF_PEOPLE.into())?;
    Ok(joined)
}

/// Left-join internet usage on (Country, Year).
///
/// Every cohort row is kept. The joined user count is the country-level total
/// and is named `Total_number_of_internet_users`; the internet table's `Code`
/// comes along for the Country dimension.
pub fn attach_internet(merged: &DataFrame, internet: &DataFrame) -> Result<DataFrame> {
    let mut internet = internet.clone();
    internet.rename(NUMBER_OF_INTERNET_USERS, TOTAL_NUMBER_OF_INTERNET_USERS.into())?;
    Ok(in_row_order(merged.clone().lazy().join(
        internet.lazy(),
        country_year(),
        country_year(),
        JoinArgs::new(JoinType::Left),
    ))
    .collect()?)
}
