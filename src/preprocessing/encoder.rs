//! Label encoding for categorical columns
//!
//! Every string column is mapped to integer codes in order of first
//! appearance. The fitted mapping is returned to the caller as an
//! [`EncodingTable`] so predictions and new inference-time rows can be
//! decoded or replayed later; the encoder itself is fresh per run.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, WorkbenchError};
use crate::schema::is_string_dtype;

/// Fitted label mappings, column name → ordered label list.
///
/// The code of a label is its index in the list. Owned by the caller after
/// preprocessing returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingTable {
    columns: BTreeMap<String, Vec<String>>,
}

impl EncodingTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    /// Ordered labels for a column, if it was encoded.
    pub fn labels(&self, column: &str) -> Option<&[String]> {
        self.columns.get(column).map(|v| v.as_slice())
    }

    /// Integer code of a label in a column.
    pub fn code(&self, column: &str, label: &str) -> Option<i64> {
        self.columns
            .get(column)?
            .iter()
            .position(|l| l == label)
            .map(|i| i as i64)
    }

    /// Label behind a code in a column.
    pub fn decode(&self, column: &str, code: i64) -> Option<&str> {
        if code < 0 {
            return None;
        }
        self.columns
            .get(column)?
            .get(code as usize)
            .map(|s| s.as_str())
    }

    fn insert(&mut self, column: String, labels: Vec<String>) {
        self.columns.insert(column, labels);
    }
}

/// Label encoder over the string columns of a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    table: EncodingTable,
    is_fitted: bool,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn first-appearance label order for the given columns.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let series = df
                .column(col_name)
                .map_err(|_| WorkbenchError::ColumnNotFound(col_name.to_string()))?
                .as_materialized_series();
            let ca = series.str()?;

            let mut labels: Vec<String> = Vec::new();
            for value in ca.into_iter().flatten() {
                if !labels.iter().any(|l| l == value) {
                    labels.push(value.to_string());
                }
            }
            self.table.insert(col_name.to_string(), labels);
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Replace every fitted column with its integer codes. Labels unseen at
    /// fit time become missing, as do missing inputs.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(WorkbenchError::NotFitted);
        }

        let mut result = df.clone();
        for col_name in self.table.column_names() {
            let Ok(col) = df.column(col_name) else { continue };
            let series = col.as_materialized_series();
            let ca = series.str()?;

            let codes: Int64Chunked = ca
                .into_iter()
                .map(|opt| opt.and_then(|v| self.table.code(col_name, v)))
                .collect();
            result.with_column(codes.with_name(series.name().clone()).into_series())?;
        }
        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Encode every string column of the table, returning the encoded table
    /// and the fitted mappings.
    pub fn encode_all(df: &DataFrame) -> Result<(DataFrame, EncodingTable)> {
        let string_cols: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| is_string_dtype(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();

        let mut encoder = LabelEncoder::new();
        let result = if string_cols.is_empty() {
            df.clone()
        } else {
            let refs: Vec<&str> = string_cols.iter().map(|s| s.as_str()).collect();
            encoder.fit_transform(df, &refs)?
        };
        Ok((result, encoder.table))
    }
}
