//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::utils::{create_spinner, finish_with_success};

/// Open a dataset lazily (CSV or Parquet based on extension).
///
/// `infer_schema_length` only applies to CSV; 0 scans the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load and collect a dataset behind a spinner.
///
/// Returns the frame with its row count, column count and estimated size in MB.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));

    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {} rows", rows));

    debug!(path = %path.display(), rows, cols, memory_mb, "dataset loaded");

    Ok((df, rows, cols, memory_mb))
}

/// First `rows` rows of the frame, for display
pub fn preview(df: &DataFrame, rows: usize) -> DataFrame {
    df.head(Some(rows))
}
