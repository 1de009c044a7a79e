//! Missing value imputation
//!
//! Numeric columns are filled with the column mean, everything else with the
//! most frequent value. Fit and application happen on the same table; a
//! fresh imputer is created per cleaning run.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, WorkbenchError};

/// Strategy for filling missing values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Column mean (numeric columns)
    Mean,
    /// Most frequent value; ties break toward the smaller value
    MostFrequent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Text(String),
}

/// Imputer for one strategy over a set of columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute fill values for the given columns.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let series = df
                .column(col_name)
                .map_err(|_| WorkbenchError::ColumnNotFound(col_name.to_string()))?
                .as_materialized_series();
            let fill = self.compute_fill_value(series)?;
            self.fill_values.insert(col_name.to_string(), fill);
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Fill missing cells in every fitted column. Numeric columns come back
    /// as Float64 since a mean is generally fractional.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(WorkbenchError::NotFitted);
        }

        let mut result = df.clone();
        for (col_name, fill) in &self.fill_values {
            if let Ok(col) = df.column(col_name) {
                let series = col.as_materialized_series();
                let filled = self.fill_series(series, fill)?;
                result.with_column(filled)?;
            }
        }
        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_fill_value(&self, series: &Series) -> Result<FillValue> {
        match self.strategy {
            ImputeStrategy::Mean => {
                let ca = series.cast(&DataType::Float64)?;
                let mean = ca.f64()?.mean().unwrap_or(0.0);
                Ok(FillValue::Numeric(mean))
            }
            ImputeStrategy::MostFrequent => {
                if series.dtype().is_primitive_numeric() {
                    let ca = series.cast(&DataType::Float64)?;
                    Ok(FillValue::Numeric(Self::mode_numeric(ca.f64()?)))
                } else {
                    Ok(FillValue::Text(Self::mode_string(series)?))
                }
            }
        }
    }

    fn mode_numeric(ca: &Float64Chunked) -> f64 {
        let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
        for val in ca.into_iter().flatten() {
            let entry = counts.entry(val.to_bits()).or_insert((val, 0));
            entry.1 += 1;
        }
        counts
            .into_values()
            .max_by(|(a, count_a), (b, count_b)| {
                count_a
                    .cmp(count_b)
                    .then(b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal))
            })
            .map(|(v, _)| v)
            .unwrap_or(0.0)
    }

    fn mode_string(series: &Series) -> Result<String> {
        let ca = series.str()?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for val in ca.into_iter().flatten() {
            *counts.entry(val).or_insert(0) += 1;
        }
        let mode = counts
            .into_iter()
            .max_by(|(a, count_a), (b, count_b)| count_a.cmp(count_b).then(b.cmp(a)))
            .map(|(v, _)| v.to_string())
            .unwrap_or_default();
        Ok(mode)
    }

    fn fill_series(&self, series: &Series, fill: &FillValue) -> Result<Series> {
        match fill {
            FillValue::Numeric(val) => {
                let casted = series.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                let filled: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
            FillValue::Text(val) => {
                let ca = series.str()?;
                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str()).to_string()))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_imputation() {
        let df = df!("a" => &[Some(1.0), Some(2.0), None, Some(4.0)]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::Mean);
        let result = imputer.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        let expected = (1.0 + 2.0 + 4.0) / 3.0;
        assert!((col.get(2).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_most_frequent_imputation() {
        let df = df!("c" => &[Some("x"), Some("x"), Some("y"), None]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        let result = imputer.fit_transform(&df, &["c"]).unwrap();

        let col = result.column("c").unwrap().str().unwrap();
        assert_eq!(col.get(3), Some("x"));
    }

    #[test]
    fn test_most_frequent_tie_breaks_to_smaller() {
        let df = df!("c" => &[Some("b"), Some("a"), None]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        let result = imputer.fit_transform(&df, &["c"]).unwrap();

        let col = result.column("c").unwrap().str().unwrap();
        assert_eq!(col.get(2), Some("a"));
    }

    #[test]
    fn test_transform_before_fit_errors() {
        let df = df!("a" => &[1.0]).unwrap();
        let imputer = Imputer::new(ImputeStrategy::Mean);
        assert!(matches!(
            imputer.transform(&df),
            Err(WorkbenchError::NotFitted)
        ));
    }
}
