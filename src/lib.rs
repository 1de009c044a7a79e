//! databench - Automatic data cleaning and model-prep workbench
//!
//! The core of an interactive data-science workbench: a tabular dataset is
//! loaded, profiled, automatically cleaned, and prepared for training a
//! best-fit predictive model. The AutoML search itself is an external
//! collaborator behind the [`training::ModelTrainer`] trait.
//!
//! # Modules
//!
//! ## Core pipeline
//! - [`schema`] - Column type classification (Binary / Categorical / Numeric / Text)
//! - [`cleaning`] - Pattern detection, field transforms, imputation, and the
//!   cleaning pipeline that orchestrates them
//! - [`preprocessing`] - Outlier filtering, label encoding, standard scaling
//!
//! ## Consumers
//! - [`profiling`] - Dataset overview, per-variable summaries, correlations,
//!   chart catalog
//! - [`modelspec`] - Serializable description of target and feature columns
//! - [`training`] - Trainer contract, baseline implementation, run orchestration
//! - [`artifacts`] - Packaging of the training outputs into one archive
//!
//! ## Infrastructure
//! - [`value`] - Tagged cell values with explicit coercions
//! - [`utils`] - Data loading and saving
//! - [`cli`] - Command-line interface

pub mod error;

pub mod cleaning;
pub mod preprocessing;
pub mod schema;
pub mod value;

pub mod modelspec;
pub mod profiling;
pub mod training;

pub mod artifacts;
pub mod utils;

pub mod cli;

pub use error::{Result, WorkbenchError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, WorkbenchError};

    // Classification
    pub use crate::schema::{classify_column, classify_table, ColumnType};

    // Cleaning
    pub use crate::cleaning::{CleanerConfig, CleaningReport, TableCleaner};

    // Preprocessing
    pub use crate::preprocessing::{
        EncodingTable, LabelEncoder, OutlierMethod, PreprocessConfig, Preprocessor, StandardScaler,
    };

    // Profiling
    pub use crate::profiling::{dataset_overview, variable_summary, DatasetOverview};

    // Training
    pub use crate::modelspec::ModelInputSpec;
    pub use crate::training::{BaselineTrainer, ModelTrainer, TargetKind, TrainEngine, TrainReport};

    // IO
    pub use crate::utils::{DataLoader, DataSaver};
}
