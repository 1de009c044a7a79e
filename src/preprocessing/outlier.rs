//! Outlier row filtering
//!
//! Removes whole rows whose value in any Numeric-classified column falls
//! outside the configured bounds. Binary columns are never considered, even
//! when their dtype is numeric.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{classify_column, ColumnType};

/// Strategy for deciding which rows are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutlierMethod {
    /// Drop rows where any numeric column's |z-score| reaches the threshold
    ZScore { threshold: f64 },
    /// Drop rows outside `[Q1 - factor*IQR, Q3 + factor*IQR]` for any
    /// numeric column
    Iqr { factor: f64 },
    /// No filtering
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { factor: 1.5 }
    }
}

/// Row filter over the table's numeric columns.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    method: OutlierMethod,
}

impl OutlierFilter {
    pub fn new(method: OutlierMethod) -> Self {
        Self { method }
    }

    pub fn zscore(threshold: f64) -> Self {
        Self::new(OutlierMethod::ZScore { threshold })
    }

    pub fn iqr(factor: f64) -> Self {
        Self::new(OutlierMethod::Iqr { factor })
    }

    /// Return the table with outlier rows removed.
    pub fn filter(&self, df: &DataFrame) -> Result<DataFrame> {
        if matches!(self.method, OutlierMethod::None) || df.height() == 0 {
            return Ok(df.clone());
        }

        let numeric: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype().is_primitive_numeric())
            .map(|c| c.name().to_string())
            .filter(|name| {
                classify_column(df, name)
                    .map(|t| t == ColumnType::Numeric)
                    .unwrap_or(false)
            })
            .collect();
        if numeric.is_empty() {
            return Ok(df.clone());
        }

        let mut keep = vec![true; df.height()];
        for name in &numeric {
            let casted = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted.f64()?;
            let values: Vec<f64> = ca.into_iter().flatten().collect();
            if values.is_empty() {
                continue;
            }

            match self.method {
                OutlierMethod::ZScore { threshold } => {
                    let n = values.len() as f64;
                    let mean = values.iter().sum::<f64>() / n;
                    let var = if values.len() < 2 {
                        0.0
                    } else {
                        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
                    };
                    let std = var.sqrt();
                    if std == 0.0 {
                        continue;
                    }
                    for (i, opt) in ca.into_iter().enumerate() {
                        if let Some(v) = opt {
                            if ((v - mean) / std).abs() >= threshold {
                                keep[i] = false;
                            }
                        }
                    }
                }
                OutlierMethod::Iqr { factor } => {
                    let mut sorted = values.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                    let q1 = quantile_linear(&sorted, 0.25);
                    let q3 = quantile_linear(&sorted, 0.75);
                    let iqr = q3 - q1;
                    let lower = q1 - factor * iqr;
                    let upper = q3 + factor * iqr;
                    for (i, opt) in ca.into_iter().enumerate() {
                        if let Some(v) = opt {
                            if v < lower || v > upper {
                                keep[i] = false;
                            }
                        }
                    }
                }
                OutlierMethod::None => {}
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }
}

/// Linear-interpolation quantile over an already sorted slice.
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
