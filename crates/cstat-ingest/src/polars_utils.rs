//! Polars AnyValue utility functions.
//!
//! Display helpers used when previewing produced tables, plus the integer
//! parsing the GDP reshaper applies to year headers.

use polars::prelude::{AnyValue, DataFrame};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats floats without trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use cstat_ingest::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(1995)), "1995");
/// assert_eq!(any_to_string(AnyValue::String("Chad")), "Chad");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// NaN and infinities are shown as-is; the pipeline never produces them but a
/// preview should not hide them either.
///
/// # Examples
///
/// ```
/// use cstat_ingest::format_numeric;
///
/// assert_eq!(format_numeric(1100.0), "1100");
/// assert_eq!(format_numeric(0.25), "0.25");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// First `limit` rows of `df` rendered as strings, with the column names.
pub fn preview_rows(df: &DataFrame, limit: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let rows = (0..df.height().min(limit))
        .map(|idx| {
            df.get_columns()
                .iter()
                .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect()
        })
        .collect();
    (headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1100.0)), "1100");
    }

    #[test]
    fn test_format_numeric_keeps_integers() {
        assert_eq!(format_numeric(1990.0), "1990");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(-0.5), "-0.5");
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64(" 1995 "), Some(1995));
        assert_eq!(parse_i64("Country Code"), None);
        assert_eq!(parse_i64("1995.5"), None);
    }

    #[test]
    fn test_preview_rows_limits_and_formats() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("Country".into(), vec!["Chad", "Chile", "China"])),
            Column::from(Series::new("GDP".into(), vec![Some(1.5), None, Some(3.0)])),
        ])
        .unwrap();
        let (headers, rows) = preview_rows(&df, 2);
        assert_eq!(headers, vec!["Country", "GDP"]);
        assert_eq!(rows, vec![vec!["Chad", "1.5"], vec!["Chile", ""]]);
    }
}
