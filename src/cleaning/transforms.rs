//! Column-level field transforms
//!
//! Money coercion, date/time decomposition, and text normalization. Each
//! transform converts unparsable values to missing rather than dropping rows
//! or raising; the imputation stage deals with the holes afterward.

use chrono::{Datelike, Timelike};
use polars::prelude::*;

use super::patterns;
use crate::error::Result;
use crate::schema::is_string_dtype;

/// Names of the three columns a date or time decomposition produces.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SplitColumn {
    pub source: String,
    pub derived: [String; 3],
}

/// Strip a money-like value down to digits, `.` and `-`, then parse.
/// Anything that still fails to parse becomes missing.
pub fn money_to_number(value: &str) -> Option<f64> {
    let stripped: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    stripped.parse::<f64>().ok()
}

/// Lowercase a value and remove every character that is not ASCII
/// alphanumeric or whitespace.
pub fn normalize_text_value(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Coerce a whole string column to numbers via [`money_to_number`].
pub fn normalize_money(series: &Series) -> Result<Series> {
    let ca = series.str()?;
    let converted: Float64Chunked = ca
        .into_iter()
        .map(|opt| opt.and_then(money_to_number))
        .collect();
    Ok(converted.with_name(series.name().clone()).into_series())
}

/// Normalize a whole string column via [`normalize_text_value`];
/// missing values pass through unchanged.
pub fn normalize_text(series: &Series) -> Result<Series> {
    let ca = series.str()?;
    let normalized: StringChunked = ca
        .into_iter()
        .map(|opt| opt.map(normalize_text_value))
        .collect();
    Ok(normalized.with_name(series.name().clone()).into_series())
}

/// Replace a date column with `{name}_dd`, `{name}_mm`, `{name}_yyyy`.
/// A value that fails to parse nulls all three derived cells for its row.
pub fn decompose_date(df: &DataFrame, name: &str) -> Result<(DataFrame, SplitColumn)> {
    let series = df.column(name)?.as_materialized_series();
    let ca = series.str()?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    let mut months: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    let mut years: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    for opt in ca.into_iter() {
        match opt.and_then(patterns::parse_date) {
            Some(date) => {
                days.push(Some(date.day() as i32));
                months.push(Some(date.month() as i32));
                years.push(Some(date.year()));
            }
            None => {
                days.push(None);
                months.push(None);
                years.push(None);
            }
        }
    }

    let split = SplitColumn {
        source: name.to_string(),
        derived: [
            format!("{}_dd", name),
            format!("{}_mm", name),
            format!("{}_yyyy", name),
        ],
    };

    let mut result = df.drop(name)?;
    result.hstack_mut(&[
        Column::new(split.derived[0].as_str().into(), days),
        Column::new(split.derived[1].as_str().into(), months),
        Column::new(split.derived[2].as_str().into(), years),
    ])?;
    Ok((result, split))
}

/// Replace a time column with `{name}_hh`, `{name}_mm`, `{name}_ss`.
pub fn decompose_time(df: &DataFrame, name: &str) -> Result<(DataFrame, SplitColumn)> {
    let series = df.column(name)?.as_materialized_series();
    let ca = series.str()?;

    let mut hours: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    let mut minutes: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    let mut seconds: Vec<Option<i32>> = Vec::with_capacity(ca.len());
    for opt in ca.into_iter() {
        match opt.and_then(patterns::parse_time) {
            Some(time) => {
                hours.push(Some(time.hour() as i32));
                minutes.push(Some(time.minute() as i32));
                seconds.push(Some(time.second() as i32));
            }
            None => {
                hours.push(None);
                minutes.push(None);
                seconds.push(None);
            }
        }
    }

    let split = SplitColumn {
        source: name.to_string(),
        derived: [
            format!("{}_hh", name),
            format!("{}_mm", name),
            format!("{}_ss", name),
        ],
    };

    let mut result = df.drop(name)?;
    result.hstack_mut(&[
        Column::new(split.derived[0].as_str().into(), hours),
        Column::new(split.derived[1].as_str().into(), minutes),
        Column::new(split.derived[2].as_str().into(), seconds),
    ])?;
    Ok((result, split))
}

/// Apply text normalization to every string column of the table.
pub fn clean_text_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_string_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    for name in names {
        let series = result.column(&name)?.as_materialized_series().clone();
        let normalized = normalize_text(&series)?;
        result.with_column(normalized)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_to_number() {
        assert_eq!(money_to_number("$1,200.50"), Some(1200.50));
        assert_eq!(money_to_number("€-3.00"), Some(-3.0));
        assert_eq!(money_to_number("abc"), None);
    }

    #[test]
    fn test_normalize_money_series() {
        let df = df!("m" => &["$1,200.50", "€-3.00", "abc"]).unwrap();
        let series = df.column("m").unwrap().as_materialized_series();
        let out = normalize_money(series).unwrap();
        let ca = out.f64().unwrap();
        assert_eq!(ca.get(0), Some(1200.50));
        assert_eq!(ca.get(1), Some(-3.0));
        assert_eq!(ca.get(2), None);
    }

    #[test]
    fn test_normalize_text_value() {
        assert_eq!(normalize_text_value("Hello, World!"), "hello world");
        assert_eq!(normalize_text_value("A-B_C 1"), "abc 1");
    }

    #[test]
    fn test_normalize_text_keeps_missing() {
        let df = df!("t" => &[Some("Ab!"), None]).unwrap();
        let series = df.column("t").unwrap().as_materialized_series();
        let out = normalize_text(series).unwrap();
        let ca = out.str().unwrap();
        assert_eq!(ca.get(0), Some("ab"));
        assert_eq!(ca.get(1), None);
    }

    #[test]
    fn test_decompose_date() {
        let df = df!("when" => &["2021-05-04", "junk"]).unwrap();
        let (out, split) = decompose_date(&df, "when").unwrap();

        assert!(out.column("when").is_err());
        assert_eq!(split.derived[0], "when_dd");

        let dd = out.column("when_dd").unwrap().i32().unwrap();
        let mm = out.column("when_mm").unwrap().i32().unwrap();
        let yyyy = out.column("when_yyyy").unwrap().i32().unwrap();
        assert_eq!(dd.get(0), Some(4));
        assert_eq!(mm.get(0), Some(5));
        assert_eq!(yyyy.get(0), Some(2021));
        // unparsable row is missing in all three derived columns
        assert_eq!(dd.get(1), None);
        assert_eq!(mm.get(1), None);
        assert_eq!(yyyy.get(1), None);
    }

    #[test]
    fn test_decompose_time() {
        let df = df!("at" => &["12:30:45"]).unwrap();
        let (out, _) = decompose_time(&df, "at").unwrap();
        assert_eq!(out.column("at_hh").unwrap().i32().unwrap().get(0), Some(12));
        assert_eq!(out.column("at_mm").unwrap().i32().unwrap().get(0), Some(30));
        assert_eq!(out.column("at_ss").unwrap().i32().unwrap().get(0), Some(45));
    }
}
