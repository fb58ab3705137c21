//! Dimension extraction and surrogate-key encoding.
//!
//! A [`Dimension`] holds the distinct values of one natural column and a
//! value-to-key map. Keys are row positions in the dimension table: dense,
//! starting at 0, in first-occurrence order unless the dimension is sorted.
//! Encoding a fact column is one hash lookup per row; missing values stay
//! missing.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series, StringChunked};

use cstat_model::columns::{AGE_CATEGORY, CENTURY, CODE, COUNTRY, DECADE, GENERATION, SEX, YEAR};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Dimension<V> {
    values: Vec<V>,
    keys: HashMap<V, u32>,
}

impl<V> Dimension<V>
where
    V: Clone + Eq + Hash,
{
    /// Distinct non-null values in order of first occurrence.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
    {
        let mut dimension = Self {
            values: Vec::new(),
            keys: HashMap::new(),
        };
        for value in values.into_iter().flatten() {
            if !dimension.keys.contains_key(&value) {
                dimension.keys.insert(value.clone(), dimension.values.len() as u32);
                dimension.values.push(value);
            }
        }
        dimension
    }

    /// Re-assign keys in ascending value order.
    #[must_use]
    pub fn sorted(mut self) -> Self
    where
        V: Ord,
    {
        self.values.sort();
        self.keys = self
            .values
            .iter()
            .enumerate()
            .map(|(key, value)| (value.clone(), key as u32))
            .collect();
        self
    }

    pub fn key_of<Q>(&self, value: &Q) -> Option<u32>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.get(value).copied()
    }

    pub fn value_of(&self, key: u32) -> Option<&V> {
        self.values.get(key as usize)
    }

    /// Replace each natural value with its key.
    pub fn encode<'a, Q, I>(&self, values: I) -> Vec<Option<u32>>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = Option<&'a Q>>,
    {
        values
            .into_iter()
            .map(|value| value.and_then(|v| self.key_of(v)))
            .collect()
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub type TextDimension = Dimension<String>;

/// Extract a string dimension from `column`.
pub fn text_dimension(column: &StringChunked) -> TextDimension {
    Dimension::from_values(column.into_iter().map(|value| value.map(str::to_string)))
}

/// Encode a string fact column against `dimension`, keeping its name.
pub fn encode_text_column(
    dimension: &TextDimension,
    name: &str,
    column: &StringChunked,
) -> Column {
    Series::new(name.into(), dimension.encode::<str, _>(column.into_iter())).into_column()
}

/// A single-column dimension table such as `Sex` or `Generation`.
pub fn text_dimension_frame(name: &str, dimension: &TextDimension) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Series::new(name.into(), dimension.values()).into_column(),
    ])?)
}

/// Years sorted ascending with `Century` and `Decade`.
pub fn year_dimension_frame(years: &Dimension<i64>) -> Result<DataFrame> {
    let centuries: Vec<i64> = years.values().iter().map(|y| century(*y)).collect();
    let decades: Vec<String> = years.values().iter().map(|y| decade_label(*y)).collect();
    Ok(DataFrame::new(vec![
        Series::new(YEAR.into(), years.values()).into_column(),
        Series::new(CENTURY.into(), centuries).into_column(),
        Series::new(DECADE.into(), decades).into_column(),
    ])?)
}

/// Integer division of the year by 100.
pub fn century(year: i64) -> i64 {
    year.div_euclid(100)
}

/// The year rounded down to a multiple of ten, e.g. `1990s` for 1995.
pub fn decade_label(year: i64) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Countries with their code.
///
/// Codes come from the internet-usage rows, which may be missing for some
/// country-years. Each country keeps the first non-null code seen, so the
/// table has exactly one row per country.
#[derive(Debug, Clone)]
pub struct CountryDimension {
    pub countries: TextDimension,
    pub codes: Vec<Option<String>>,
}

impl CountryDimension {
    pub fn extract(countries: &StringChunked, codes: &StringChunked) -> Self {
        let dimension = text_dimension(countries);
        let mut resolved: Vec<Option<String>> = vec![None; dimension.len()];
        for (country, code) in countries.into_iter().zip(codes.into_iter()) {
            let (Some(country), Some(code)) = (country, code) else {
                continue;
            };
            if let Some(key) = dimension.key_of(country) {
                let slot = &mut resolved[key as usize];
                if slot.is_none() {
                    *slot = Some(code.to_string());
                }
            }
        }
        Self {
            countries: dimension,
            codes: resolved,
        }
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(COUNTRY.into(), self.countries.values()).into_column(),
            Series::new(CODE.into(), self.codes.clone()).into_column(),
        ])?)
    }
}

/// All five dimensions of the schema.
#[derive(Debug, Clone)]
pub struct Dimensions {
    pub generations: TextDimension,
    pub years: Dimension<i64>,
    pub sexes: TextDimension,
    pub countries: CountryDimension,
    pub age_categories: TextDimension,
}

impl Dimensions {
    /// Extract every dimension from the fully merged cohort table.
    ///
    /// `merged` must hold `Generation`, `Year`, `Sex`, `Age`, `Country` and
    /// `Code`.
    pub fn extract(merged: &DataFrame, age_column: &str) -> Result<Self> {
        let years = merged.column(YEAR)?.i64()?;
        Ok(Self {
            generations: text_dimension(merged.column(GENERATION)?.str()?),
            years: Dimension::from_values(years.into_iter()).sorted(),
            sexes: text_dimension(merged.column(SEX)?.str()?),
            countries: CountryDimension::extract(
                merged.column(COUNTRY)?.str()?,
                merged.column(CODE)?.str()?,
            ),
            age_categories: text_dimension(merged.column(age_column)?.str()?),
        })
    }

    pub fn generation_frame(&self) -> Result<DataFrame> {
        text_dimension_frame(GENERATION, &self.generations)
    }

    pub fn year_frame(&self) -> Result<DataFrame> {
        year_dimension_frame(&self.years)
    }

    pub fn sex_frame(&self) -> Result<DataFrame> {
        text_dimension_frame(SEX, &self.sexes)
    }

    pub fn country_frame(&self) -> Result<DataFrame> {
        self.countries.to_frame()
    }

    pub fn age_category_frame(&self) -> Result<DataFrame> {
        text_dimension_frame(AGE_CATEGORY, &self.age_categories)
    }
}
