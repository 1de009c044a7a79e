//! Pairwise Pearson correlations
//!
//! Binary and Categorical string columns enter the matrix through their
//! label codes; Text columns are excluded. Columns are ordered by sorted
//! name, and each pair is computed over rows where both values are present.

use ndarray::Array2;
use polars::prelude::*;

use crate::error::Result;
use crate::schema::{classify_column, distinct_values, is_string_dtype, ColumnType};

/// A symmetric correlation matrix with its column order.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }
}

/// Compute the correlation matrix over every correlatable column.
/// Returns None when no column qualifies.
pub fn correlation_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>> {
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        let series = col.as_materialized_series();

        if series.dtype().is_primitive_numeric() {
            let casted = series.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = casted.f64()?.into_iter().collect();
            columns.push((name, values));
        } else if is_string_dtype(series.dtype()) {
            let dtype = classify_column(df, &name)?;
            if dtype == ColumnType::Binary || dtype == ColumnType::Categorical {
                let labels = distinct_values(series);
                let ca = series.str()?;
                let values: Vec<Option<f64>> = ca
                    .into_iter()
                    .map(|opt| {
                        opt.and_then(|v| labels.iter().position(|l| l == v))
                            .map(|i| i as f64)
                    })
                    .collect();
                columns.push((name, values));
            }
        }
    }

    if columns.is_empty() {
        return Ok(None);
    }

    columns.sort_by(|(a, _), (b, _)| a.cmp(b));

    let n = columns.len();
    let mut values = Array2::zeros((n, n));
    for i in 0..n {
        values[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&columns[i].1, &columns[j].1);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    Ok(Some(CorrelationMatrix {
        columns: columns.into_iter().map(|(name, _)| name).collect(),
        values,
    }))
}

/// Pearson correlation over rows where both values are present.
/// NaN when fewer than two complete pairs exist or either side is constant.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
