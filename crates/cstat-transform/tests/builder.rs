//! End-to-end tests for the star-schema builder.

use std::collections::{BTreeMap, HashSet};

use polars::df;
use polars::prelude::DataFrame;

use cstat_model::{ImputationPolicy, StarTable};
use cstat_transform::{NormalizedTables, StarSchema, StarSchemaBuilder, TransformError};

fn gdp() -> DataFrame {
    df![
        "Country" => ["Chad", "Chad", "Chad", "Chile"],
        "Year" => [1995i64, 1996, 1997, 1995],
        "GDP" => [Some(100.0), Some(110.0), None, Some(500.0)],
    ]
    .unwrap()
}

fn internet() -> DataFrame {
    df![
        "Country" => ["Chad", "Chad"],
        "Code" => ["TCD", "TCD"],
        "Year" => [1995i64, 1997],
        "Number_of_internet_users" => [50.0, 120.0],
    ]
    .unwrap()
}

fn suicide() -> DataFrame {
    df![
        "Country" => ["Chad", "Chad", "Chad", "Chad", "Chad", "Chile"],
        "Year" => [1995i64, 1995, 1996, 1997, 1997, 1996],
        "Sex" => ["male", "female", "male", "male", "female", "male"],
        "Age" => ["15-24 years", "25-34 years", "15-24 years", "15-24 years", "25-34 years", "15-24 years"],
        "Suicides_number" => [3i64, 1, 0, 4, 2, 0],
        "Population" => [600.0, 400.0, 0.0, 700.0, 500.0, 0.0],
        "Generation" => ["Generation X", "Boomers", "Generation X", "Generation X", "Boomers", "Silent"],
    ]
    .unwrap()
}

fn tables() -> NormalizedTables {
    NormalizedTables {
        gdp: gdp(),
        internet: internet(),
        suicide: suicide(),
    }
}

fn build() -> StarSchema {
    StarSchemaBuilder::new(ImputationPolicy::CountryMean)
        .build(tables())
        .unwrap()
}

fn data(schema: &StarSchema, table: StarTable) -> &DataFrame {
    &schema.frame(table).unwrap().data
}

fn text_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn key_values(df: &DataFrame, column: &str) -> Vec<Option<u32>> {
    df.column(column)
        .unwrap()
        .u32()
        .unwrap()
        .into_iter()
        .collect()
}

fn float_values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}

#[test]
fn seven_tables_in_write_order() {
    let schema = build();
    let tables: Vec<StarTable> = schema.frames().iter().map(|frame| frame.table).collect();
    assert_eq!(tables, StarTable::ALL.to_vec());
    for frame in schema.frames() {
        assert_eq!(frame.data.get_column_names_str(), frame.table.columns());
    }
}

#[test]
fn zero_total_is_replaced_by_country_mean() {
    let schema = build();
    let facts = data(&schema, StarTable::CountryDependingFacts);
    let years = data(&schema, StarTable::Years);

    let year_of: Vec<i64> = years
        .column("Year")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    let mut totals: BTreeMap<(u32, i64), Option<f64>> = BTreeMap::new();
    for ((country, year), total) in key_values(facts, "Country")
        .into_iter()
        .zip(key_values(facts, "Year"))
        .zip(float_values(facts, "Total_population"))
    {
        totals.insert((country.unwrap(), year_of[year.unwrap() as usize]), total);
    }

    // Chad is key 0: 1000 and 1200 observed, 1996 had only zero-population rows.
    assert_eq!(totals[&(0, 1995)], Some(1000.0));
    assert_eq!(totals[&(0, 1996)], Some(1100.0));
    assert_eq!(totals[&(0, 1997)], Some(1200.0));

    let report = schema.report();
    assert_eq!(report.imputation.imputed_groups, 1);
}

#[test]
fn country_without_non_zero_population_stays_missing() {
    let schema = build();
    let facts = data(&schema, StarTable::CountryDependingFacts);

    for (country, total) in key_values(facts, "Country")
        .into_iter()
        .zip(float_values(facts, "Total_population"))
    {
        if country == Some(1) {
            assert_eq!(total, None);
        }
    }
    let imputation = &schema.report().imputation;
    assert_eq!(imputation.undefined_groups, 2);
    assert!(imputation.undefined_countries.contains("Chile"));
}

#[test]
fn missing_internet_row_gives_missing_not_zero() {
    let schema = build();
    let people = data(&schema, StarTable::PeopleDependingFacts);
    let country = data(&schema, StarTable::CountryDependingFacts);

    // Rows follow (Country, Year) order: Chad 1995 (2 rows), Chad 1996, Chad 1997 (2 rows),
    // Chile 1995, Chile 1996.
    let totals = float_values(country, "Total_number_of_internet_users");
    assert_eq!(totals[0], Some(50.0));
    assert_eq!(totals[2], None);
    assert_eq!(totals[5], None);

    let users = float_values(people, "Number_of_internet_users");
    assert!(close(users[0], 30.0));
    assert!(close(users[1], 20.0));
    assert_eq!(users[2], None);
    assert!(close(users[3], 70.0));
}

#[test]
fn population_share_is_a_fraction_or_missing() {
    let schema = build();
    let people = data(&schema, StarTable::PeopleDependingFacts);
    let shares = float_values(people, "Percentage_of_population");

    assert!(close(shares[0], 0.6));
    assert!(close(shares[1], 0.4));
    assert_eq!(shares[2], Some(0.0));
    assert_eq!(shares[5], None);
    assert_eq!(shares[6], None);
    for share in shares.into_iter().flatten() {
        assert!((0.0..=1.0).contains(&share));
    }
}

#[test]
fn cohort_people_sum_to_observed_totals() {
    let schema = build();
    let people = data(&schema, StarTable::PeopleDependingFacts);
    let country = data(&schema, StarTable::CountryDependingFacts);

    let mut cohort_sums: BTreeMap<(u32, u32), f64> = BTreeMap::new();
    let mut totals: BTreeMap<(u32, u32), Option<f64>> = BTreeMap::new();
    let keys: Vec<(u32, u32)> = key_values(people, "Country")
        .into_iter()
        .zip(key_values(people, "Year"))
        .map(|(c, y)| (c.unwrap(), y.unwrap()))
        .collect();
    for ((key, count), total) in keys
        .iter()
        .zip(float_values(people, "Number_of_people"))
        .zip(float_values(country, "Total_population"))
    {
        *cohort_sums.entry(*key).or_default() += count.unwrap_or(0.0);
        totals.insert(*key, total);
    }

    let imputed = schema.report().imputation.imputed_groups;
    let mut diverging = 0;
    for (key, sum) in cohort_sums {
        match totals[&key] {
            Some(total) if (total - sum).abs() < 1e-9 => {}
            Some(_) => diverging += 1,
            None => {}
        }
    }
    assert_eq!(diverging, imputed);
}

#[test]
fn dimensions_are_unique_and_densely_keyed() {
    let schema = build();
    for (table, column) in [
        (StarTable::Generations, "Generation"),
        (StarTable::Sexes, "Sex"),
        (StarTable::Countries, "Country"),
        (StarTable::AgeCategories, "Age_category"),
    ] {
        let values = text_values(data(&schema, table), column);
        let distinct: HashSet<_> = values.iter().collect();
        assert_eq!(distinct.len(), values.len(), "{table} has duplicates");
        assert!(values.iter().all(Option::is_some), "{table} has nulls");
    }

    assert_eq!(
        text_values(data(&schema, StarTable::Generations), "Generation"),
        vec![
            Some("Generation X".to_string()),
            Some("Boomers".to_string()),
            Some("Silent".to_string()),
        ]
    );
    let years = data(&schema, StarTable::Years);
    let years: Vec<i64> = years
        .column("Year")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(years, vec![1995, 1996, 1997]);

    let countries = data(&schema, StarTable::Countries);
    assert_eq!(
        text_values(countries, "Code"),
        vec![Some("TCD".to_string()), None]
    );
}

#[test]
fn fact_keys_decode_to_original_values() {
    let schema = build();
    let people = data(&schema, StarTable::PeopleDependingFacts);
    let sexes = text_values(data(&schema, StarTable::Sexes), "Sex");
    let ages = text_values(data(&schema, StarTable::AgeCategories), "Age_category");

    let decode = |keys: Vec<Option<u32>>, dimension: &[Option<String>]| -> Vec<Option<String>> {
        keys.into_iter()
            .map(|key| key.map(|k| dimension[k as usize].clone().unwrap()))
            .collect()
    };

    let decoded_sexes = decode(key_values(people, "Sex"), &sexes);
    assert_eq!(
        decoded_sexes,
        vec![
            Some("male".to_string()),
            Some("female".to_string()),
            Some("male".to_string()),
            Some("male".to_string()),
            Some("female".to_string()),
            None,
            Some("male".to_string()),
        ]
    );
    let decoded_ages = decode(key_values(people, "Age_category"), &ages);
    assert_eq!(decoded_ages[1], Some("25-34 years".to_string()));
    assert_eq!(decoded_ages[5], None);

    for (table, dimension) in [
        (StarTable::Generations, "Generation"),
        (StarTable::Years, "Year"),
        (StarTable::Countries, "Country"),
    ] {
        let size = data(&schema, table).height() as u32;
        for key in key_values(people, dimension).into_iter().flatten() {
            assert!(key < size, "{dimension} key {key} out of range");
        }
    }
}

#[test]
fn duplicate_internet_key_is_fatal() {
    let mut tables = tables();
    tables.internet = df![
        "Country" => ["Chad", "Chad"],
        "Code" => ["TCD", "TCD"],
        "Year" => [1995i64, 1995],
        "Number_of_internet_users" => [50.0, 60.0],
    ]
    .unwrap();

    let err = StarSchemaBuilder::default().build(tables).unwrap_err();

    assert!(matches!(
        err,
        TransformError::DuplicateKey { table: "internet", year: 1995, .. }
    ));
}

#[test]
fn missing_builder_column_is_fatal() {
    let mut tables = tables();
    tables.suicide.drop_in_place("Generation").unwrap();

    let err = StarSchemaBuilder::default().build(tables).unwrap_err();

    assert_eq!(
        err.to_string(),
        "required column 'Generation' not found in suicide table"
    );
}

#[test]
fn policy_none_keeps_zero_totals_and_drops_share() {
    let schema = StarSchemaBuilder::new(ImputationPolicy::None)
        .build(tables())
        .unwrap();
    let country = data(&schema, StarTable::CountryDependingFacts);
    let people = data(&schema, StarTable::PeopleDependingFacts);

    assert_eq!(float_values(country, "Total_population")[2], Some(0.0));
    assert_eq!(float_values(people, "Percentage_of_population")[2], None);
    assert_eq!(schema.report().imputation.imputed_groups, 0);
}
