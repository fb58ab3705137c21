//! Tests for the GDP wide-to-long reshaper.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use cstat_transform::{TransformError, reshape_gdp};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            Series::new(
                name.into(),
                values.iter().copied().map(String::from).collect::<Vec<_>>(),
            )
            .into_column()
        })
        .collect();
    DataFrame::new(cols).unwrap()
}

fn rows(df: &DataFrame) -> Vec<(String, i64, Option<f64>)> {
    let countries = df.column("Country").unwrap().str().unwrap();
    let years = df.column("Year").unwrap().i64().unwrap();
    let gdp = df.column("GDP").unwrap().f64().unwrap();
    (0..df.height())
        .map(|idx| {
            (
                countries.get(idx).unwrap().to_string(),
                years.get(idx).unwrap(),
                gdp.get(idx),
            )
        })
        .collect()
}

#[test]
fn chad_and_chile_yield_four_rows_without_2019() {
    let raw = test_df(vec![
        ("Country ", vec!["Chad", "Chile"]),
        ("Country Code", vec!["TCD", "CHL"]),
        ("Indicator Name", vec!["GDP per capita", "GDP per capita"]),
        ("Indicator Code", vec!["NY.GDP.PCAP.CD", "NY.GDP.PCAP.CD"]),
        ("1995", vec!["220.5", "5100"]),
        ("1996", vec!["240", ""]),
        ("2019", vec!["700", "15000"]),
    ]);

    let long = reshape_gdp(&raw, &[2019]).unwrap();

    assert_eq!(long.get_column_names_str(), vec!["Country", "Year", "GDP"]);
    assert_eq!(
        rows(&long),
        vec![
            ("Chad".to_string(), 1995, Some(220.5)),
            ("Chad".to_string(), 1996, Some(240.0)),
            ("Chile".to_string(), 1995, Some(5100.0)),
            ("Chile".to_string(), 1996, None),
        ]
    );
}

#[test]
fn values_follow_their_year_label_not_position() {
    let raw = test_df(vec![
        ("Country ", vec!["Chad"]),
        ("1996", vec!["240"]),
        ("1995", vec!["220"]),
    ]);

    let long = reshape_gdp(&raw, &[]).unwrap();

    assert_eq!(
        rows(&long),
        vec![
            ("Chad".to_string(), 1996, Some(240.0)),
            ("Chad".to_string(), 1995, Some(220.0)),
        ]
    );
}

#[test]
fn absent_dropped_year_is_ignored() {
    let raw = test_df(vec![("Country", vec!["Chad"]), ("1995", vec!["1"])]);
    let long = reshape_gdp(&raw, &[2019]).unwrap();
    assert_eq!(long.height(), 1);
}

#[test]
fn missing_country_column_is_schema_error() {
    let raw = test_df(vec![("Entity", vec!["Chad"]), ("1995", vec!["1"])]);
    let err = reshape_gdp(&raw, &[]).unwrap_err();
    assert!(matches!(
        err,
        TransformError::MissingColumn { table: "gdp", ref column } if column == "Country"
    ));
}

#[test]
fn table_without_year_columns_is_rejected() {
    let raw = test_df(vec![("Country ", vec!["Chad"]), ("2019", vec!["1"])]);
    let err = reshape_gdp(&raw, &[2019]).unwrap_err();
    assert!(matches!(err, TransformError::NoYearColumns));
}

#[test]
fn repeated_year_label_is_rejected() {
    let raw = test_df(vec![
        ("Country ", vec!["Chad"]),
        ("1995", vec!["1"]),
        (" 1995", vec!["2"]),
    ]);
    let err = reshape_gdp(&raw, &[]).unwrap_err();
    assert!(matches!(err, TransformError::DuplicateYearColumn { year: 1995 }));
}
