//! Pattern detectors for money-, date-, and time-like text columns
//!
//! Each detector decides per value, then per column via a majority-threshold
//! rule over non-missing values. Dates use the highest bar because date
//! parsing is the most ambiguity-prone; currency symbols and colon-separated
//! numerics are distinctive enough for a lower one. Detectors never error on
//! data content: non-string and unparsable values are simply non-matches.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use rayon::prelude::*;
use regex::Regex;

use crate::schema::is_string_dtype;

/// Fraction of non-missing values that must look like money.
pub const MONEY_THRESHOLD: f64 = 0.5;
/// Fraction of non-missing values that must parse as a date.
pub const DATE_THRESHOLD: f64 = 0.8;
/// Fraction of non-missing values that must parse as a clock time.
pub const TIME_THRESHOLD: f64 = 0.5;

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\$€₹]?\s*-?\d+(\.\d+)?\s*$").expect("money pattern"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Whether a single value looks like a money amount: optional currency
/// symbol, optional minus sign, digits, optional decimal fraction, nothing
/// else trailing.
pub fn is_money(value: &str) -> bool {
    MONEY_RE.is_match(value)
}

/// Parse a value as a calendar date. Ambiguous numeric forms resolve
/// month-first, and the year is never assumed to come first in slash forms.
/// No fuzzy matching: the whole value must be a date (or datetime).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a value as a clock time. Pure time-of-day forms match, as do
/// datetime forms carrying an explicit time component; a bare date does not.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, fmt) {
            return Some(time);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.time());
        }
    }
    None
}

pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

pub fn is_time(value: &str) -> bool {
    parse_time(value).is_some()
}

/// Fraction of non-missing values in a string column satisfying `pred`.
/// Returns 0.0 for columns with no non-missing values.
fn match_fraction(series: &Series, pred: impl Fn(&str) -> bool) -> f64 {
    let Ok(ca) = series.str() else { return 0.0 };
    let mut matched = 0usize;
    let mut total = 0usize;
    for value in ca.into_iter().flatten() {
        total += 1;
        if pred(value) {
            matched += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

fn matching_columns(
    df: &DataFrame,
    threshold: f64,
    pred: impl Fn(&str) -> bool + Sync,
) -> Vec<String> {
    df.get_columns()
        .par_iter()
        .filter_map(|col| {
            let series = col.as_materialized_series();
            if !is_string_dtype(series.dtype()) {
                return None;
            }
            if match_fraction(series, &pred) > threshold {
                Some(col.name().to_string())
            } else {
                None
            }
        })
        .collect()
}

/// String columns whose non-missing values are mostly money-like.
pub fn money_columns(df: &DataFrame, threshold: f64) -> Vec<String> {
    matching_columns(df, threshold, is_money)
}

/// String columns whose non-missing values are mostly dates.
pub fn date_columns(df: &DataFrame, threshold: f64) -> Vec<String> {
    matching_columns(df, threshold, is_date)
}

/// String columns whose non-missing values are mostly clock times.
pub fn time_columns(df: &DataFrame, threshold: f64) -> Vec<String> {
    matching_columns(df, threshold, is_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_is_money() {
        assert!(is_money("$100"));
        assert!(is_money("€-3.00"));
        assert!(is_money(" ₹ 250.75 "));
        assert!(is_money("42"));
        assert!(!is_money("$1,200.50")); // thousands separator is not money-shaped
        assert!(!is_money("abc"));
        assert!(!is_money("$100 USD"));
        assert!(!is_money(""));
    }

    #[test]
    fn test_parse_date_month_first() {
        let d = parse_date("04/05/2021").unwrap();
        assert_eq!((d.day(), d.month(), d.year()), (5, 4, 2021));

        let d = parse_date("2021-05-04").unwrap();
        assert_eq!((d.day(), d.month(), d.year()), (4, 5, 2021));

        assert!(parse_date("04 May 2021").is_some());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("1200").is_none());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("12:30:45").unwrap().hour(), 12);
        assert_eq!(parse_time("08:15").unwrap().minute(), 15);
        assert!(parse_time("2021-05-04 08:15:00").is_some());
        // A bare date has no explicit time component
        assert!(parse_time("2021-05-04").is_none());
        assert!(parse_time("hello").is_none());
    }

    #[test]
    fn test_date_columns_threshold() {
        // 4 of 5 values parse: 0.8 does not strictly exceed the threshold
        let df = df!(
            "d" => &["2021-05-04", "2021-05-05", "2021-05-06", "2021-05-07", "junk"],
        )
        .unwrap();
        assert!(date_columns(&df, DATE_THRESHOLD).is_empty());

        // 5 of 5 values parse
        let df = df!(
            "d" => &["2021-05-04", "2021-05-05", "2021-05-06", "2021-05-07", "2021-05-08"],
        )
        .unwrap();
        assert_eq!(date_columns(&df, DATE_THRESHOLD), vec!["d"]);
    }

    #[test]
    fn test_money_columns_ignore_missing() {
        // 2 of 3 non-missing values match: fraction 0.67 > 0.5
        let df = df!(
            "price" => &[Some("$10"), Some("$20"), Some("n/a"), None],
        )
        .unwrap();
        assert_eq!(money_columns(&df, MONEY_THRESHOLD), vec!["price"]);
    }

    #[test]
    fn test_numeric_columns_are_skipped() {
        let df = df!("x" => &[1.0, 2.0, 3.0]).unwrap();
        assert!(money_columns(&df, MONEY_THRESHOLD).is_empty());
        assert!(date_columns(&df, DATE_THRESHOLD).is_empty());
        assert!(time_columns(&df, TIME_THRESHOLD).is_empty());
    }
}
