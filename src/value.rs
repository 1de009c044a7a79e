//! Tagged cell values
//!
//! A table cell is dynamically typed during cleaning: a column can hold
//! numbers, text, and missing values at once while transforms are in flight.
//! `CellValue` is the explicit three-way tag for that state, with coercions
//! spelled out instead of relying on implicit dispatch.

use polars::prelude::AnyValue;
use std::fmt;

/// A single cell of a table, as seen by the cleaning pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Convert a polars cell into its tagged form.
    ///
    /// Booleans coerce to 0/1; any dtype without a natural number or text
    /// reading falls back to its display form as text.
    pub fn from_any(av: &AnyValue) -> Self {
        match av {
            AnyValue::Null => CellValue::Missing,
            AnyValue::String(s) => CellValue::Text((*s).to_string()),
            AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
            AnyValue::Float64(v) => CellValue::Number(*v),
            AnyValue::Float32(v) => CellValue::Number(*v as f64),
            AnyValue::Int8(v) => CellValue::Number(*v as f64),
            AnyValue::Int16(v) => CellValue::Number(*v as f64),
            AnyValue::Int32(v) => CellValue::Number(*v as f64),
            AnyValue::Int64(v) => CellValue::Number(*v as f64),
            AnyValue::UInt8(v) => CellValue::Number(*v as f64),
            AnyValue::UInt16(v) => CellValue::Number(*v as f64),
            AnyValue::UInt32(v) => CellValue::Number(*v as f64),
            AnyValue::UInt64(v) => CellValue::Number(*v as f64),
            AnyValue::Boolean(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
            other => CellValue::Text(format!("{}", other)),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric reading of the cell. Text is parsed; failure and Missing
    /// both yield None.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Missing => None,
        }
    }

    /// Text reading of the cell; Missing yields None.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Missing => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => write!(f, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_any() {
        assert_eq!(CellValue::from_any(&AnyValue::Null), CellValue::Missing);
        assert_eq!(
            CellValue::from_any(&AnyValue::Float64(2.5)),
            CellValue::Number(2.5)
        );
        assert_eq!(
            CellValue::from_any(&AnyValue::String("abc")),
            CellValue::Text("abc".to_string())
        );
        assert_eq!(
            CellValue::from_any(&AnyValue::Boolean(true)),
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn test_to_number_parses_text() {
        assert_eq!(CellValue::Text(" 3.5 ".to_string()).to_number(), Some(3.5));
        assert_eq!(CellValue::Text("abc".to_string()).to_number(), None);
        assert_eq!(CellValue::Missing.to_number(), None);
    }

    #[test]
    fn test_missing_has_empty_display() {
        assert_eq!(CellValue::Missing.to_string(), "");
        assert!(CellValue::Missing.to_text().is_none());
    }
}
