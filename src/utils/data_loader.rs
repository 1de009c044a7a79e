//! Data loading utilities

use crate::error::{Result, WorkbenchError};
use polars::prelude::*;
use std::fs::File;

/// Loader for the tabular formats the workbench accepts.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    infer_schema_length: Option<usize>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(100),
        }
    }

    /// Set how many rows to sample for schema inference
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| WorkbenchError::DataError(e.to_string()))
    }

    /// Load a line-delimited JSON file
    pub fn load_json(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;
        JsonReader::new(file)
            .finish()
            .map_err(|e| WorkbenchError::DataError(e.to_string()))
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| WorkbenchError::DataError(e.to_string()))
    }

    /// Detect the format from the extension and load
    pub fn load_auto(&self, path: &str) -> Result<DataFrame> {
        let lower = path.to_lowercase();
        if lower.ends_with(".parquet") || lower.ends_with(".pq") {
            self.load_parquet(path)
        } else if lower.ends_with(".json") || lower.ends_with(".jsonl") {
            self.load_json(path)
        } else {
            self.load_csv(path)
        }
    }
}

/// Save a table back to disk.
pub struct DataSaver;

impl DataSaver {
    pub fn save_csv(df: &mut DataFrame, path: &str) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .finish(df)
            .map_err(|e| WorkbenchError::DataError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1,x").unwrap();
        writeln!(file, "2,y").unwrap();

        let df = DataLoader::new()
            .load_auto(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_save_and_reload_csv() {
        let mut df = df!(
            "a" => &[1.0, 2.0, 3.0],
            "b" => &["x", "y", "z"],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let path = file.path().to_str().unwrap();
        DataSaver::save_csv(&mut df, path).unwrap();

        let reloaded = DataLoader::new().load_csv(path).unwrap();
        assert_eq!(reloaded.shape(), (3, 2));
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(DataLoader::new().load_csv("/no/such/file.csv").is_err());
    }
}
