//! Post-cleaning preprocessing for modeling
//!
//! Fixed order: outlier row filtering → label encoding → standard scaling.
//! Filtering precedes scaling so the scaler's statistics reflect the
//! filtered population. Every run starts from fresh encoder and scaler
//! state; the fitted [`EncodingTable`] is handed to the caller.

mod config;
pub mod encoder;
pub mod outlier;
mod scaler;

pub use config::PreprocessConfig;
pub use encoder::{EncodingTable, LabelEncoder};
pub use outlier::{OutlierFilter, OutlierMethod};
pub use scaler::StandardScaler;

use polars::prelude::*;

use crate::error::{Result, WorkbenchError};
use crate::schema::{classify_column, ColumnType};

/// The modeling preprocessor.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::with_config(PreprocessConfig::default())
    }

    pub fn with_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Run the full preprocessing sequence. The returned table is entirely
    /// numeric; the returned [`EncodingTable`] is required to decode
    /// predictions or replay the encoding on new rows.
    pub fn run(&self, df: &DataFrame) -> Result<(DataFrame, EncodingTable)> {
        if df.width() == 0 {
            return Err(WorkbenchError::EmptyInput("table has no columns".to_string()));
        }
        if df.height() == 0 {
            return Err(WorkbenchError::EmptyInput("table has no rows".to_string()));
        }

        let filtered = OutlierFilter::new(self.config.outlier_method).filter(df)?;

        let (encoded, encoding_table) = LabelEncoder::encode_all(&filtered)?;

        // Scale every column classified Numeric on the encoded table; Binary
        // columns keep their raw codes
        let scale_cols: Vec<String> = encoded
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .filter(|name| {
                classify_column(&encoded, name)
                    .map(|t| t == ColumnType::Numeric)
                    .unwrap_or(false)
            })
            .collect();

        let result = if scale_cols.is_empty() {
            encoded
        } else {
            let refs: Vec<&str> = scale_cols.iter().map(|s| s.as_str()).collect();
            StandardScaler::new().fit_transform(&encoded, &refs)?
        };

        Ok((result, encoding_table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "age" => &[25.0, 30.0, 35.0, 40.0, 45.0],
            "city" => &["nyc", "la", "nyc", "sf", "la"],
            "flag" => &[0.0, 1.0, 0.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_output_is_entirely_numeric() {
        let (result, encoders) = Preprocessor::new().run(&sample_df()).unwrap();

        for col in result.get_columns() {
            assert!(col.dtype().is_primitive_numeric(), "{} not numeric", col.name());
        }
        assert_eq!(encoders.labels("city").unwrap(), &["nyc", "la", "sf"]);
    }

    #[test]
    fn test_binary_column_is_not_scaled() {
        let (result, _) = Preprocessor::new().run(&sample_df()).unwrap();

        // "flag" keeps its raw 0/1 values
        let flag = result.column("flag").unwrap().f64().unwrap();
        let values: Vec<f64> = flag.into_iter().flatten().collect();
        assert!(values.iter().all(|v| *v == 0.0 || *v == 1.0));

        // "age" is standardized
        let age = result.column("age").unwrap().f64().unwrap();
        assert!(age.mean().unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_empty_input_is_structural_error() {
        let df = DataFrame::empty();
        assert!(matches!(
            Preprocessor::new().run(&df),
            Err(WorkbenchError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_fresh_state_per_run() {
        let preprocessor = Preprocessor::new();
        let (_, first) = preprocessor.run(&sample_df()).unwrap();
        let (_, second) = preprocessor.run(&sample_df()).unwrap();
        assert_eq!(first, second);
    }
}
