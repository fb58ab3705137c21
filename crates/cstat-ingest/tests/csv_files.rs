use std::fs;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use cstat_ingest::{IngestError, read_csv_frame, read_csv_headers, require_columns, write_indexed_csv};

fn internet_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::from(Series::new("Country".into(), vec!["Chad", "Chile"])),
        Column::from(Series::new("Year".into(), vec![1995i64, 1995])),
        Column::from(Series::new(
            "Number_of_internet_users".into(),
            vec![None, Some(250.5f64)],
        )),
    ])
    .unwrap()
}

#[test]
fn missing_values_round_trip_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("internet_usage.csv");
    write_indexed_csv(&internet_frame(), &path, b',').unwrap();

    let df = read_csv_frame(&path, b',').unwrap();
    let users = df.column("Number_of_internet_users").unwrap().str().unwrap();
    assert_eq!(users.get(0), None);
    assert_eq!(users.get(1), Some("250.5"));
    let ids = df.column("id").unwrap().str().unwrap();
    assert_eq!(ids.get(1), Some("1"));
}

#[test]
fn custom_delimiter_is_used_for_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("internet_usage.csv");
    write_indexed_csv(&internet_frame(), &path, b'|').unwrap();

    let first_line = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert_eq!(first_line, "id|Country|Year|Number_of_internet_users");

    let headers = read_csv_headers(&path, b'|').unwrap();
    assert!(require_columns(&headers, &["id", "Country", "Year"], &path).is_ok());
}

#[test]
fn header_check_reports_offending_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("share-of-individuals-using-the-internet.csv");
    fs::write(&path, "Entity,Year\nChad,1995\n").unwrap();

    let headers = read_csv_headers(&path, b',').unwrap();
    let err = require_columns(
        &headers,
        &["Entity", "Number of internet users (OWID based on WB & UN)"],
        &path,
    )
    .unwrap_err();

    match err {
        IngestError::MissingColumn { column, path: reported } => {
            assert_eq!(column, "Number of internet users (OWID based on WB & UN)");
            assert_eq!(reported, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}
