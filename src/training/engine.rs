//! Training run orchestration
//!
//! Drives one training run over an already-cleaned table: structural
//! validation, input-spec construction, target encoding, preprocessing, the
//! external trainer call, and artifact packaging. The engine holds no state
//! between runs.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{ModelTrainer, TargetKind, TrainOutcome};
use crate::artifacts;
use crate::error::{Result, WorkbenchError};
use crate::modelspec::ModelInputSpec;
use crate::preprocessing::{EncodingTable, LabelEncoder, PreprocessConfig, Preprocessor};
use crate::schema::{self, classify_column, ColumnType};

/// Result of one training run.
#[derive(Debug)]
pub struct TrainReport {
    pub model_name: String,
    pub leaderboard: DataFrame,
    pub spec: ModelInputSpec,
    pub encoders: EncodingTable,
    /// Path of the packaged artifacts, when an output directory was given
    pub package_path: Option<PathBuf>,
}

/// Orchestrates a full training run.
#[derive(Debug, Clone, Default)]
pub struct TrainEngine {
    preprocess: PreprocessConfig,
}

impl TrainEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocess_config(config: PreprocessConfig) -> Self {
        Self { preprocess: config }
    }

    /// Run training on a cleaned table. A trainer failure aborts the run
    /// before any artifact is produced.
    pub fn run(
        &self,
        df: &DataFrame,
        target: &str,
        trainer: &dyn ModelTrainer,
        out_dir: Option<&Path>,
    ) -> Result<TrainReport> {
        // Structural validation before any stage runs
        if df.width() == 0 || df.height() == 0 {
            return Err(WorkbenchError::EmptyInput("nothing to train on".to_string()));
        }
        if df.column(target).is_err() {
            return Err(WorkbenchError::ColumnNotFound(target.to_string()));
        }
        let target_type = classify_column(df, target)?;
        if target_type == ColumnType::Text {
            return Err(WorkbenchError::InvalidTarget(format!(
                "{} is free text and cannot be predicted",
                target
            )));
        }

        // The input spec describes columns as they stand before encoding
        let spec = ModelInputSpec::build(df, target)?;

        // A categorical target must be numeric before preprocessing so the
        // feature encoder does not claim it
        let mut table = df.clone();
        if matches!(target_type, ColumnType::Binary | ColumnType::Categorical)
            && schema::is_string_dtype(table.column(target)?.dtype())
        {
            let mut target_encoder = LabelEncoder::new();
            table = target_encoder.fit_transform(&table, &[target])?;
        }

        let (prepared, encoders) = Preprocessor::with_config(self.preprocess.clone()).run(&table)?;

        // Columns can collapse to a single value once outlier rows are gone
        let prepared = drop_single_valued(prepared)?;
        if prepared.column(target).is_err() {
            return Err(WorkbenchError::InvalidTarget(format!(
                "{} has a single value after preprocessing",
                target
            )));
        }

        let kind = match target_type {
            ColumnType::Numeric => TargetKind::Numeric,
            _ => TargetKind::Categorical,
        };

        info!(target_column = target, rows = prepared.height(), "starting trainer");
        let TrainOutcome { model, leaderboard } = trainer
            .train_and_select(&prepared, target, kind)
            .map_err(|e| match e {
                WorkbenchError::TrainingError(_) => e,
                other => WorkbenchError::TrainingError(other.to_string()),
            })?;

        let package_path = match out_dir {
            Some(dir) => Some(artifacts::write_package(dir, &spec, &encoders, model.as_ref())?),
            None => None,
        };

        Ok(TrainReport {
            model_name: model.name().to_string(),
            leaderboard,
            spec,
            encoders,
            package_path,
        })
    }
}

fn drop_single_valued(mut df: DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }
    let constant: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| {
            schema::distinct_count(c.as_materialized_series())
                .map(|n| n <= 1)
                .unwrap_or(false)
        })
        .map(|c| c.name().to_string())
        .collect();
    for name in constant {
        df = df.drop(&name)?;
    }
    Ok(df)
}
