//! Integration test: the whole workbench flow
//!
//! Load a messy CSV, clean it, profile it, train a model, and unpack the
//! resulting artifact bundle.

use databench::prelude::*;
use std::io::Write;

fn write_messy_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "price,rooms,city,listed,status").unwrap();
    writeln!(file, "$250000,3,Austin,2021-03-15,sold").unwrap();
    writeln!(file, "$250000,3,Austin,2021-03-15,sold").unwrap();
    writeln!(file, "$180000,2,Dallas,2020-07-01,sold").unwrap();
    writeln!(file, "$320000,4,Austin,2022-01-20,open").unwrap();
    writeln!(file, "$210000,3,Houston,2021-11-05,open").unwrap();
    writeln!(file, "bad,2,Dallas,2019-05-30,sold").unwrap();
    writeln!(file, "$150000,1,Houston,2020-02-14,open").unwrap();
    writeln!(file, "$280000,4,Dallas,2022-09-09,sold").unwrap();
    file
}

#[test]
fn test_load_clean_profile_train_package() {
    let csv = write_messy_csv();
    let df = DataLoader::new()
        .load_auto(csv.path().to_str().unwrap())
        .unwrap();
    assert_eq!(df.height(), 8);

    // clean: duplicate row removed, money coerced, date split
    let (cleaned, report) = TableCleaner::new().clean(&df).unwrap();
    assert_eq!(report.duplicate_rows_dropped, 1);
    assert_eq!(report.money_columns_coerced, vec!["price"]);
    assert_eq!(report.date_columns_split.len(), 1);
    assert!(cleaned.column("listed").is_err());
    assert!(cleaned.column("listed_yyyy").is_ok());

    // profile the cleaned table
    let overview = dataset_overview(&cleaned).unwrap();
    assert_eq!(overview.n_observations, 7);
    assert_eq!(overview.missing_cells, 0);
    assert!(overview.type_counts.len() >= 2);

    let price = variable_summary(&cleaned, "price").unwrap();
    assert_eq!(price.dtype, ColumnType::Numeric);
    assert_eq!(price.missing, 0);

    // train against the binary status column and package the artifacts
    let dir = tempfile::tempdir().unwrap();
    let report = TrainEngine::new()
        .run(&cleaned, "status", &BaselineTrainer::new(), Some(dir.path()))
        .unwrap();

    assert_eq!(report.model_name, "majority_class");
    let labels = report.encoders.labels("city").unwrap();
    assert_eq!(labels, &["austin", "dallas", "houston"]);

    let package = report.package_path.unwrap();
    assert!(package.exists());

    let file = std::fs::File::open(&package).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 3);
    assert!(archive.by_name("model_inputs.json").is_ok());
}

#[test]
fn test_spec_reflects_pre_encoding_labels() {
    let csv = write_messy_csv();
    let df = DataLoader::new()
        .load_auto(csv.path().to_str().unwrap())
        .unwrap();
    let (cleaned, _) = TableCleaner::new().clean(&df).unwrap();

    let spec = ModelInputSpec::build(&cleaned, "status").unwrap();
    assert_eq!(spec.target.variable_type, ColumnType::Binary);
    let inputs = spec.target.inputs.as_ref().unwrap();
    assert_eq!(inputs[&1], "sold");
    assert_eq!(inputs[&2], "open");
}
