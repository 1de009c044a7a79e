//! Error types for the databench workbench

use thiserror::Error;

/// Result type alias for workbench operations
pub type Result<T> = std::result::Result<T, WorkbenchError>;

/// Main error type for the workbench.
///
/// Value-level parse failures (money, date, time, numeric coercion) are never
/// represented here: they are converted to missing values at the cell where
/// they occur. Only structural problems and collaborator failures surface.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Encoder not fitted")]
    NotFitted,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for WorkbenchError {
    fn from(err: polars::error::PolarsError) -> Self {
        WorkbenchError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for WorkbenchError {
    fn from(err: serde_json::Error) -> Self {
        WorkbenchError::SerializationError(err.to_string())
    }
}

impl From<zip::result::ZipError> for WorkbenchError {
    fn from(err: zip::result::ZipError) -> Self {
        WorkbenchError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkbenchError::EmptyInput("table has no rows".to_string());
        assert_eq!(err.to_string(), "Empty input: table has no rows");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WorkbenchError = io_err.into();
        assert!(matches!(err, WorkbenchError::IoError(_)));
    }
}
