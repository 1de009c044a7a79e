//! Model input specification
//!
//! A serializable description of the target and feature columns as they
//! stand before encoding: name, classified type, distinct-value percentage,
//! and the input enumeration for Binary/Categorical columns. Built once per
//! training run, immutable afterward, and handed to packaging.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, WorkbenchError};
use crate::schema::{classify_column, distinct_count, distinct_values, ColumnType};

/// Metadata for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub variable_name: String,
    pub variable_type: ColumnType,
    /// Distinct values as a percentage of rows, rounded to 2 decimals
    pub unique_percentage: f64,
    /// 1-based index → label, present only for Binary/Categorical columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<BTreeMap<usize, String>>,
}

/// The full input specification for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInputSpec {
    pub target: ColumnMeta,
    /// 1-based feature index → metadata, in table column order
    pub input_columns: BTreeMap<usize, ColumnMeta>,
}

impl ModelInputSpec {
    /// Build the spec from the table as it stands before encoding.
    pub fn build(df: &DataFrame, target: &str) -> Result<Self> {
        if df.column(target).is_err() {
            return Err(WorkbenchError::ColumnNotFound(target.to_string()));
        }

        let target_meta = column_meta(df, target)?;

        let mut input_columns = BTreeMap::new();
        let mut idx = 1usize;
        for col in df.get_columns() {
            let name = col.name().as_str();
            if name == target {
                continue;
            }
            input_columns.insert(idx, column_meta(df, name)?);
            idx += 1;
        }

        Ok(Self {
            target: target_meta,
            input_columns,
        })
    }
}

fn column_meta(df: &DataFrame, name: &str) -> Result<ColumnMeta> {
    let series = df.column(name)?.as_materialized_series();
    let dtype = classify_column(df, name)?;

    let distinct = distinct_count(series)?;
    let pct = distinct as f64 / df.height().max(1) as f64 * 100.0;
    let unique_percentage = (pct * 100.0).round() / 100.0;

    let inputs = if matches!(dtype, ColumnType::Binary | ColumnType::Categorical) {
        let map: BTreeMap<usize, String> = distinct_values(series)
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i + 1, v))
            .collect();
        Some(map)
    } else {
        None
    };

    Ok(ColumnMeta {
        variable_name: name.to_string(),
        variable_type: dtype,
        unique_percentage,
        inputs,
    })
}
