//! Baseline trainer
//!
//! A reference implementation of the [`ModelTrainer`] contract: ordinary
//! least squares for numeric targets, most-frequent-class for categorical
//! ones. It exists so the workbench runs end-to-end without an external
//! AutoML engine and so the contract has something to test against.

use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ModelTrainer, SelectedModel, TargetKind, TrainOutcome};
use crate::error::{Result, WorkbenchError};

/// Gauss-Jordan inversion for the small normal-equation systems below.
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..2 * n {
                let tmp = aug[[col, j]];
                aug[[col, j]] = aug[[max_row, j]];
                aug[[max_row, j]] = tmp;
            }
        }
        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }
        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    let mut inv = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }
    Some(inv)
}

/// Least squares via the normal equations: (X^T X)^-1 X^T y.
fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Option<Array1<f64>> {
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    matrix_inverse(&xtx).map(|inv| inv.dot(&xty))
}

/// Extract a feature matrix and target vector from a numeric table.
fn to_matrix(df: &DataFrame, target: &str) -> Result<(Array2<f64>, Array1<f64>, Vec<String>)> {
    let feature_names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|n| n != target)
        .collect();

    let n_rows = df.height();
    let mut x = Array2::zeros((n_rows, feature_names.len()));
    for (j, name) in feature_names.iter().enumerate() {
        let casted = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        for (i, opt) in ca.into_iter().enumerate() {
            x[[i, j]] = opt.unwrap_or(0.0);
        }
    }

    let casted = df
        .column(target)
        .map_err(|_| WorkbenchError::ColumnNotFound(target.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    let mut y = Array1::zeros(n_rows);
    for (i, opt) in ca.into_iter().enumerate() {
        y[i] = opt.unwrap_or(0.0);
    }

    Ok((x, y, feature_names))
}

/// Least-squares regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeastSquaresModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl SelectedModel for LeastSquaresModel {
    fn name(&self) -> &str {
        "least_squares"
    }

    fn predict(&self, df: &DataFrame) -> Result<Vec<f64>> {
        let n_rows = df.height();
        let mut out = vec![self.intercept; n_rows];
        for (j, name) in self.feature_names.iter().enumerate() {
            let casted = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted.f64()?;
            for (i, opt) in ca.into_iter().enumerate() {
                out[i] += self.coefficients[j] * opt.unwrap_or(0.0);
            }
        }
        Ok(out)
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Most-frequent-class model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorityClassModel {
    pub class: f64,
}

impl SelectedModel for MajorityClassModel {
    fn name(&self) -> &str {
        "majority_class"
    }

    fn predict(&self, df: &DataFrame) -> Result<Vec<f64>> {
        Ok(vec![self.class; df.height()])
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The built-in trainer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineTrainer;

impl BaselineTrainer {
    pub fn new() -> Self {
        Self
    }

    fn train_regression(&self, df: &DataFrame, target: &str) -> Result<TrainOutcome> {
        let (x, y, feature_names) = to_matrix(df, target)?;
        if x.ncols() == 0 {
            return Err(WorkbenchError::TrainingError(
                "no feature columns left for training".to_string(),
            ));
        }

        // Center to fit an intercept without augmenting the design matrix
        let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = &x - &x_mean.clone().insert_axis(Axis(0));
        let y_centered = &y - y_mean;

        let coefficients = solve_least_squares(&x_centered, &y_centered).ok_or_else(|| {
            WorkbenchError::TrainingError("normal equations are singular".to_string())
        })?;
        let intercept = y_mean - coefficients.dot(&x_mean);

        let model = LeastSquaresModel {
            feature_names,
            coefficients: coefficients.to_vec(),
            intercept,
        };

        let predictions = model.predict(df)?;
        let rmse = (predictions
            .iter()
            .zip(y.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / y.len().max(1) as f64)
            .sqrt();

        let leaderboard = df!(
            "model" => &[model.name().to_string()],
            "rmse" => &[rmse],
        )?;

        Ok(TrainOutcome {
            model: Box::new(model),
            leaderboard,
        })
    }

    fn train_classification(&self, df: &DataFrame, target: &str) -> Result<TrainOutcome> {
        let casted = df
            .column(target)
            .map_err(|_| WorkbenchError::ColumnNotFound(target.to_string()))?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let ca = casted.f64()?;

        let mut counts: std::collections::HashMap<u64, (f64, usize)> =
            std::collections::HashMap::new();
        for val in ca.into_iter().flatten() {
            counts.entry(val.to_bits()).or_insert((val, 0)).1 += 1;
        }
        let (class, class_count) = counts
            .into_values()
            .max_by(|(a, count_a), (b, count_b)| {
                count_a
                    .cmp(count_b)
                    .then(b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal))
            })
            .ok_or_else(|| {
                WorkbenchError::TrainingError("target column has no values".to_string())
            })?;

        let model = MajorityClassModel { class };
        let accuracy = class_count as f64 / ca.len().max(1) as f64;

        let leaderboard = df!(
            "model" => &[model.name().to_string()],
            "accuracy" => &[accuracy],
        )?;

        Ok(TrainOutcome {
            model: Box::new(model),
            leaderboard,
        })
    }
}

impl ModelTrainer for BaselineTrainer {
    fn train_and_select(
        &self,
        df: &DataFrame,
        target: &str,
        kind: TargetKind,
    ) -> Result<TrainOutcome> {
        match kind {
            TargetKind::Numeric => self.train_regression(df, target),
            TargetKind::Categorical => self.train_classification(df, target),
        }
    }
}
