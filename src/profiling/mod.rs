//! Dataset profiling
//!
//! Summary statistics consumed by the exploration surfaces: a whole-table
//! overview, per-variable summaries keyed by the classified column type, and
//! the bivariate chart catalog. Chart rendering itself lives outside the
//! core.

pub mod correlations;

pub use correlations::{correlation_matrix, CorrelationMatrix};

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cleaning::duplicate_row_count;
use crate::error::{Result, WorkbenchError};
use crate::schema::{classify_column, distinct_count, ColumnType};

/// Whole-table statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetOverview {
    pub n_variables: usize,
    pub n_observations: usize,
    pub missing_cells: usize,
    pub missing_pct: f64,
    pub duplicate_rows: usize,
    pub duplicate_pct: f64,
    pub memory_bytes: usize,
    pub type_counts: BTreeMap<ColumnType, usize>,
}

/// Compute the dataset overview.
pub fn dataset_overview(df: &DataFrame) -> Result<DatasetOverview> {
    if df.width() == 0 || df.height() == 0 {
        return Err(WorkbenchError::EmptyInput("nothing to profile".to_string()));
    }

    let n_rows = df.height();
    let n_cols = df.width();
    let missing_cells: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
    let total_cells = n_rows * n_cols;
    let duplicate_rows = duplicate_row_count(df)?;

    let mut type_counts: BTreeMap<ColumnType, usize> = BTreeMap::new();
    for col in df.get_columns() {
        let t = classify_column(df, col.name().as_str())?;
        *type_counts.entry(t).or_insert(0) += 1;
    }

    Ok(DatasetOverview {
        n_variables: n_cols,
        n_observations: n_rows,
        missing_cells,
        missing_pct: missing_cells as f64 / total_cells as f64 * 100.0,
        duplicate_rows,
        duplicate_pct: duplicate_rows as f64 / n_rows as f64 * 100.0,
        memory_bytes: df.estimated_size(),
        type_counts,
    })
}

/// Per-column statistics. Numeric-only fields are None for other types.
#[derive(Debug, Clone, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub distinct: usize,
    pub distinct_pct: f64,
    pub missing: usize,
    pub missing_pct: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub zeros: Option<usize>,
    pub negatives: Option<usize>,
    pub infinite: Option<usize>,
}

/// Summarize one column.
pub fn variable_summary(df: &DataFrame, name: &str) -> Result<VariableSummary> {
    let column = df
        .column(name)
        .map_err(|_| WorkbenchError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series();
    let dtype = classify_column(df, name)?;

    let n_rows = df.height().max(1);
    let distinct = distinct_count(series)?;
    let missing = series.null_count();

    let mut summary = VariableSummary {
        name: name.to_string(),
        dtype,
        distinct,
        distinct_pct: distinct as f64 / n_rows as f64 * 100.0,
        missing,
        missing_pct: missing as f64 / n_rows as f64 * 100.0,
        mean: None,
        min: None,
        max: None,
        zeros: None,
        negatives: None,
        infinite: None,
    };

    if series.dtype().is_primitive_numeric() {
        let casted = series.cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        let finite: Vec<f64> = ca.into_iter().flatten().filter(|v| v.is_finite()).collect();
        if !finite.is_empty() {
            summary.mean = Some(finite.iter().sum::<f64>() / finite.len() as f64);
            summary.min = Some(finite.iter().cloned().fold(f64::INFINITY, f64::min));
            summary.max = Some(finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        }
        summary.zeros = Some(finite.iter().filter(|v| **v == 0.0).count());
        summary.negatives = Some(finite.iter().filter(|v| **v < 0.0).count());
        summary.infinite = Some(ca.into_iter().flatten().filter(|v| v.is_infinite()).count());
    }

    Ok(summary)
}

/// Chart families the analysis page can offer for a column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Scatter,
    Bar,
    Line,
    Bubble,
    Histogram,
    Pie,
    Treemap,
    Funnel,
    Sankey,
}

/// Valid chart types for an (x, y) pair of column types. Unlisted pairs fall
/// back to the flipped pair, then to nothing.
pub fn chart_options(x: ColumnType, y: ColumnType) -> &'static [ChartKind] {
    use ChartKind::*;
    use ColumnType::*;

    fn lookup(x: ColumnType, y: ColumnType) -> Option<&'static [ChartKind]> {
        match (x, y) {
            (Numeric, Numeric) => Some(&[Scatter, Bar, Line, Bubble, Histogram]),
            (Numeric, Categorical) => Some(&[Scatter, Bar]),
            (Categorical, Numeric) => Some(&[Scatter, Bar, Funnel]),
            (Categorical, Categorical) => Some(&[Scatter, Bar, Pie, Treemap, Funnel, Sankey]),
            _ => None,
        }
    }

    lookup(x, y).or_else(|| lookup(y, x)).unwrap_or(&[])
}
