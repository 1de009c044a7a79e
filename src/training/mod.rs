//! Model training orchestration
//!
//! The AutoML search itself is an external collaborator behind the
//! [`ModelTrainer`] trait: it receives the fully preprocessed table, the
//! target column, and the target's semantic kind, and returns one selected
//! model plus a leaderboard. The core treats it as a black box.
//! [`baseline::BaselineTrainer`] is a minimal built-in implementation of the
//! contract; [`engine::TrainEngine`] drives a whole training run.

pub mod baseline;
pub mod engine;

pub use baseline::BaselineTrainer;
pub use engine::{TrainEngine, TrainReport};

use polars::prelude::*;

use crate::error::Result;

/// Semantic kind of the target column, as the trainer contract sees it:
/// Numeric targets get a regression search, everything else classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Numeric,
    Categorical,
}

/// A model selected by a trainer.
pub trait SelectedModel {
    /// Human-readable model name for the leaderboard and artifacts
    fn name(&self) -> &str;

    /// Predict the target for each row of a feature table
    fn predict(&self, df: &DataFrame) -> Result<Vec<f64>>;

    /// Serializable form of the fitted model for packaging
    fn to_json(&self) -> Result<serde_json::Value>;
}

/// Result of one trainer invocation.
pub struct TrainOutcome {
    pub model: Box<dyn SelectedModel>,
    /// One row per candidate model with its evaluation metrics
    pub leaderboard: DataFrame,
}

/// The external AutoML collaborator contract.
pub trait ModelTrainer {
    /// Train candidate models on the preprocessed table and return the best
    /// one. The table is entirely numeric and `target` names one of its
    /// columns.
    fn train_and_select(
        &self,
        df: &DataFrame,
        target: &str,
        kind: TargetKind,
    ) -> Result<TrainOutcome>;
}
