//! Command-line interface
//!
//! Thin glue over the library: load a table, run the cleaning pipeline, show
//! a profile, or drive a full training run. No pipeline logic lives here.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::cleaning::TableCleaner;
use crate::error::Result;
use crate::preprocessing::{OutlierMethod, PreprocessConfig};
use crate::profiling::{self, correlation_matrix};
use crate::training::{BaselineTrainer, TrainEngine};
use crate::utils::{DataLoader, DataSaver};

#[derive(Parser)]
#[command(name = "databench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automatic data cleaning, profiling, and model-prep workbench")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a dataset and write the result
    Clean {
        /// Input data file (CSV, JSON, or Parquet)
        data: PathBuf,
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Profile a dataset
    Profile {
        /// Input data file (CSV, JSON, or Parquet)
        data: PathBuf,
        /// Summarize a single column instead of the whole table
        #[arg(short, long)]
        column: Option<String>,
    },
    /// Clean, preprocess, train, and package a model
    Train {
        /// Input data file (CSV, JSON, or Parquet)
        data: PathBuf,
        /// Target column name
        #[arg(short, long)]
        target: String,
        /// Directory for the packaged artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Outlier strategy: iqr, zscore, or none
        #[arg(long, default_value = "iqr")]
        outliers: String,
    },
}

fn step(msg: &str) {
    println!("  {} {}", "›".blue(), msg);
}

fn done(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

pub fn cmd_clean(data: &PathBuf, output: &PathBuf) -> Result<()> {
    step(&format!("loading {}", data.display()));
    let df = DataLoader::new().load_auto(&data.to_string_lossy())?;
    done(&format!("{} rows × {} columns", df.height(), df.width()));

    step("cleaning");
    let (mut cleaned, report) = TableCleaner::new().clean(&df)?;
    done(&format!(
        "{} duplicate rows, {} empty rows, {} columns dropped, {} split, {} coerced",
        report.duplicate_rows_dropped,
        report.empty_rows_dropped,
        report.dropped_columns.len(),
        report.date_columns_split.len() + report.time_columns_split.len(),
        report.money_columns_coerced.len(),
    ));

    DataSaver::save_csv(&mut cleaned, &output.to_string_lossy())?;
    done(&format!(
        "wrote {} ({} rows × {} columns)",
        output.display(),
        cleaned.height(),
        cleaned.width()
    ));
    Ok(())
}

pub fn cmd_profile(data: &PathBuf, column: Option<&str>) -> Result<()> {
    let df = DataLoader::new().load_auto(&data.to_string_lossy())?;

    match column {
        Some(name) => {
            let summary = profiling::variable_summary(&df, name)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => {
            let overview = profiling::dataset_overview(&df)?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
            if let Some(matrix) = correlation_matrix(&df)? {
                println!();
                println!("correlations over: {}", matrix.columns.join(", "));
            }
        }
    }
    Ok(())
}

pub fn cmd_train(data: &PathBuf, target: &str, out_dir: &PathBuf, outliers: &str) -> Result<()> {
    let method = match outliers {
        "zscore" => OutlierMethod::ZScore { threshold: 3.0 },
        "none" => OutlierMethod::None,
        _ => OutlierMethod::Iqr { factor: 1.5 },
    };

    step(&format!("loading {}", data.display()));
    let df = DataLoader::new().load_auto(&data.to_string_lossy())?;

    step("cleaning");
    let (cleaned, _) = TableCleaner::new().clean(&df)?;
    done(&format!("{} rows × {} columns", cleaned.height(), cleaned.width()));

    step(&format!("training on target {}", target.bold()));
    let engine =
        TrainEngine::with_preprocess_config(PreprocessConfig::new().with_outlier_method(method));
    let report = engine.run(&cleaned, target, &BaselineTrainer::new(), Some(out_dir))?;

    done(&format!("best model: {}", report.model_name.bold()));
    println!("{}", report.leaderboard);
    if let Some(path) = report.package_path {
        done(&format!("package: {}", path.display()));
    }
    Ok(())
}
