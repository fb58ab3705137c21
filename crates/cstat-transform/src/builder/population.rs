//! Population total imputation.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{info, warn};

use cstat_model::ImputationPolicy;
use cstat_model::columns::{COUNTRY, TOTAL_POPULATION, YEAR};

use crate::error::Result;

/// What imputation did to the per-country-year totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputationOutcome {
    /// Zero totals replaced by the country mean.
    pub imputed_groups: usize,
    /// Zero totals left missing because the country has no non-zero total.
    pub undefined_groups: usize,
    /// Countries behind `undefined_groups`.
    pub undefined_countries: BTreeSet<String>,
}

/// Replace zero totals with the mean of the same country's non-zero totals.
///
/// A zero total usually means the source has no cohort rows for that year.
/// When the country has no non-zero total to average, the value becomes
/// missing rather than staying zero. Groups with a null Country or Year are
/// left as they are; no cohort row can join back onto them. Under [`ImputationPolicy::None`] totals are
/// returned unchanged.
pub fn impute_population(
    mut totals: DataFrame,
    policy: ImputationPolicy,
) -> Result<(DataFrame, ImputationOutcome)> {
    if policy == ImputationPolicy::None {
        return Ok((totals, ImputationOutcome::default()));
    }

    let (imputed, outcome) = {
        let countries = totals.column(COUNTRY)?.str()?;
        let years = totals.column(YEAR)?.i64()?;
        let values = totals.column(TOTAL_POPULATION)?.f64()?;

        let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for ((country, year), value) in countries
            .into_iter()
            .zip(years.into_iter())
            .zip(values.into_iter())
        {
            if let (Some(country), Some(_), Some(value)) = (country, year, value)
                && value != 0.0
            {
                let entry = sums.entry(country).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let mut outcome = ImputationOutcome::default();
        let imputed: Vec<Option<f64>> = countries
            .into_iter()
            .zip(years.into_iter())
            .zip(values.into_iter())
            .map(|((country, year), value)| match (country, year, value) {
                (Some(country), Some(_), Some(total)) if total == 0.0 => {
                    let mean = sums.get(country).map(|(sum, count)| sum / *count as f64);
                    match mean {
                        Some(_) => outcome.imputed_groups += 1,
                        None => {
                            outcome.undefined_groups += 1;
                            outcome.undefined_countries.insert(country.to_string());
                        }
                    }
                    mean
                }
                _ => value,
            })
            .collect();
        (imputed, outcome)
    };

    totals.with_column(Series::new(TOTAL_POPULATION.into(), imputed).into_column())?;

    info!(
        imputed = outcome.imputed_groups,
        undefined = outcome.undefined_groups,
        "population totals imputed"
    );
    if !outcome.undefined_countries.is_empty() {
        warn!(
            countries = ?outcome.undefined_countries,
            "no non-zero population to impute from; totals left missing"
        );
    }
    Ok((totals, outcome))
}
