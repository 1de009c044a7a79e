//! Column type classification
//!
//! The semantic type of a column is derived from its current contents and
//! never stored: the table mutates between cleaning stages, so every consumer
//! re-queries. Classification order matters: the Binary check runs before
//! any dtype check, so a numeric column with exactly two observed values is
//! Binary, not Numeric.

use crate::error::{Result, WorkbenchError};
use crate::value::CellValue;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Distinct non-missing values that make a column Binary.
pub const BINARY_DISTINCT: usize = 2;

/// String columns with fewer distinct values than this are Categorical;
/// at or above it they are Text.
pub const CATEGORICAL_MAX_DISTINCT: usize = 50;

/// Semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Binary,
    Categorical,
    Numeric,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Binary => "Binary",
            ColumnType::Categorical => "Categorical",
            ColumnType::Numeric => "Numeric",
            ColumnType::Text => "Text",
        };
        write!(f, "{}", s)
    }
}

/// Classify a single column by its current contents.
///
/// Pure and deterministic for an unmodified column; recomputed per call, not
/// cached. The behavior on a column whose values are all missing is
/// unspecified; callers exclude all-missing columns before classifying.
pub fn classify_column(df: &DataFrame, name: &str) -> Result<ColumnType> {
    let column = df
        .column(name)
        .map_err(|_| WorkbenchError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series();

    let distinct = distinct_count(series)?;
    if distinct == BINARY_DISTINCT {
        return Ok(ColumnType::Binary);
    }

    let dtype = series.dtype();
    if is_string_dtype(dtype) {
        if distinct < CATEGORICAL_MAX_DISTINCT {
            Ok(ColumnType::Categorical)
        } else {
            Ok(ColumnType::Text)
        }
    } else if dtype.is_primitive_numeric() {
        Ok(ColumnType::Numeric)
    } else {
        Ok(ColumnType::Text)
    }
}

/// Classify every column. The map iterates in sorted-name order, not table
/// column order.
pub fn classify_table(df: &DataFrame) -> Result<BTreeMap<String, ColumnType>> {
    let mut types = BTreeMap::new();
    for col in df.get_columns() {
        let name = col.name().to_string();
        types.insert(name.clone(), classify_column(df, &name)?);
    }
    Ok(types)
}

/// Number of distinct non-missing values in a column.
pub fn distinct_count(series: &Series) -> Result<usize> {
    Ok(series.drop_nulls().n_unique()?)
}

/// Distinct non-missing values rendered as text, in order of first appearance.
pub fn distinct_values(series: &Series) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for i in 0..series.len() {
        let Ok(av) = series.get(i) else { continue };
        let cell = CellValue::from_any(&av);
        if cell.is_missing() {
            continue;
        }
        let rendered = cell.to_string();
        if seen.insert(rendered.clone()) {
            values.push(rendered);
        }
    }
    values
}

pub(crate) fn is_string_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}
