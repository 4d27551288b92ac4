//! Unit tests for dataset loader

use fairlens::pipeline::{load_dataset_with_progress, preview};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "gender,age,hired").unwrap();
    writeln!(file, "F,31,1").unwrap();
    writeln!(file, "M,45,0").unwrap();
    drop(file);

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 2, "Should have 2 data rows");
    assert_eq!(cols, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["gender", "age", "hired"]);
    assert_eq!(df.column("gender").unwrap().dtype(), &DataType::String);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_loan_dataframe();
    let (_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded_df, rows, cols, _mem) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 10);
    assert_eq!(cols, 4);
    assert_eq!(loaded_df.get_column_names(), &["region", "approved", "income", "age"]);
}

#[test]
fn test_unsupported_format_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, b"not a dataset").unwrap();

    let result = load_dataset_with_progress(&path, 100);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unsupported file format"));
}

#[test]
fn test_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.csv");

    assert!(load_dataset_with_progress(&path, 100).is_err());
}

#[test]
fn test_preview_limits_rows() {
    let df = common::create_loan_dataframe();

    assert_eq!(preview(&df, 3).height(), 3);
    assert_eq!(preview(&df, 50).height(), 10);
}
