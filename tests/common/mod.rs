//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// The two-group hiring example: A,A,B,B,B with outcomes 1,1,0,0,1.
///
/// Both columns are text, so both get encoded (A=0, B=1; "0"=0, "1"=1).
pub fn create_binary_text_dataframe() -> DataFrame {
    df! {
        "group" => ["A", "A", "B", "B", "B"],
        "outcome" => ["1", "1", "0", "0", "1"],
    }
    .unwrap()
}

/// Loan approvals across three regions with a numeric score
///
/// - `region`: text demographic with three values, first seen "north"
/// - `approved`: binary numeric outcome
/// - `income`: continuous numeric column
pub fn create_loan_dataframe() -> DataFrame {
    df! {
        "region" => ["north", "south", "east", "north", "south", "east", "north", "south", "east", "north"],
        "approved" => [1i64, 0, 1, 1, 0, 0, 1, 1, 0, 1],
        "income" => [52.0f64, 31.0, 44.0, 61.0, 29.0, 38.0, 57.0, 40.0, 35.0, 66.0],
        "age" => [34i64, 51, 29, 45, 38, 62, 27, 33, 48, 41],
    }
    .unwrap()
}

/// Dataset where the reference group never has a positive outcome
pub fn create_zero_reference_dataframe() -> DataFrame {
    df! {
        "team" => ["red", "red", "blue", "blue", "green"],
        "promoted" => [0i64, 0, 1, 0, 1],
    }
    .unwrap()
}

/// Dataset with a single demographic value
pub fn create_single_group_dataframe() -> DataFrame {
    df! {
        "site" => ["x", "x", "x", "x"],
        "passed" => [1i64, 0, 1, 1],
    }
    .unwrap()
}

/// Random categorical demographic and a three-level outcome for property tests
pub fn create_random_dataframe(rows: usize, groups: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let demographic: Vec<String> = (0..rows)
        .map(|_| format!("g{}", rng.gen_range(0..groups)))
        .collect();
    let target: Vec<f64> = (0..rows).map(|_| rng.gen_range(0..3) as f64).collect();

    df! {
        "demographic" => demographic,
        "target" => target,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree to within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {} (±{}), got {}",
        expected,
        tol,
        actual
    );
}
