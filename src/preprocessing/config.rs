//! Preprocessing configuration

use serde::{Deserialize, Serialize};

use super::outlier::OutlierMethod;

/// Configuration for the modeling preprocessor.
///
/// Exactly one outlier strategy is active per run; the choice is static
/// configuration, never data-dependent. IQR filtering is the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// How to filter outlier rows before encoding and scaling
    pub outlier_method: OutlierMethod,
}

impl PreprocessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the outlier strategy
    pub fn with_outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = method;
        self
    }
}
