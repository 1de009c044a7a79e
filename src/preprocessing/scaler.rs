//! Standard scaling of numeric columns

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, WorkbenchError};

/// Per-column parameters of a fitted scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    std: f64,
}

/// Standardizes columns to zero mean and unit variance, each independently.
/// Fit and applied on the same data; fresh per preprocessing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let series = df
                .column(col_name)
                .map_err(|_| WorkbenchError::ColumnNotFound(col_name.to_string()))?
                .as_materialized_series();
            let casted = series.cast(&DataType::Float64)?;
            let ca = casted.f64()?;

            let mean = ca.mean().unwrap_or(0.0);
            let std = ca.std(1).unwrap_or(1.0);
            self.params.insert(
                col_name.to_string(),
                ScalerParams {
                    mean,
                    std: if std == 0.0 { 1.0 } else { std },
                },
            );
        }
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(WorkbenchError::NotFitted);
        }

        let mut result = df.clone();
        for (col_name, params) in &self.params {
            let Ok(col) = df.column(col_name) else { continue };
            let series = col.as_materialized_series();
            let casted = series.cast(&DataType::Float64)?;
            let ca = casted.f64()?;

            let scaled: Float64Chunked = ca
                .into_iter()
                .map(|opt| opt.map(|v| (v - params.mean) / params.std))
                .collect();
            result.with_column(scaled.with_name(series.name().clone()).into_series())?;
        }
        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Undo the scaling, recovering the original units.
    pub fn inverse_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(WorkbenchError::NotFitted);
        }

        let mut result = df.clone();
        for (col_name, params) in &self.params {
            let Ok(col) = df.column(col_name) else { continue };
            let series = col.as_materialized_series();
            let ca = series.f64()?;

            let unscaled: Float64Chunked = ca
                .into_iter()
                .map(|opt| opt.map(|v| v * params.std + params.mean))
                .collect();
            result.with_column(unscaled.with_name(series.name().clone()).into_series())?;
        }
        Ok(result)
    }
}
