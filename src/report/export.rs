//! Fairness metrics export to JSON and CSV

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{AssociationMethod, FairnessConfig, GroupMetrics, MetricsTable};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub fairlens_version: String,
    pub input_file: String,
    pub demographic_column: String,
    pub target_column: String,
    pub codes_as_categorical: bool,
    pub association_method: AssociationMethod,
    /// Dataset-wide association value, `null` when undefined
    pub association_value: f64,
    /// Label of the baseline group
    pub reference_group: String,
}

/// Complete fairness report with metadata
#[derive(Serialize)]
pub struct FairnessExport<'a> {
    pub metadata: ReportMetadata,
    pub groups: &'a [GroupMetrics],
}

/// Build the serializable report for a finished analysis
pub fn build_export<'a>(
    table: &'a MetricsTable,
    config: &FairnessConfig,
    input_file: &str,
) -> FairnessExport<'a> {
    FairnessExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            fairlens_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            demographic_column: config.demographic.clone(),
            target_column: config.target.clone(),
            codes_as_categorical: config.codes_as_categorical,
            association_method: table.method(),
            association_value: table.association().value,
            reference_group: table.reference().label.clone(),
        },
        groups: table.rows(),
    }
}

/// Export the metrics table to a JSON file. NaN metrics are written as `null`.
pub fn export_json(
    table: &MetricsTable,
    config: &FairnessConfig,
    input_file: &str,
    output_path: &Path,
) -> Result<()> {
    let export = build_export(table, config, input_file);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize fairness report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write fairness report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}

/// Export the metrics table to a CSV file at full precision
pub fn export_csv(table: &MetricsTable, output_path: &Path) -> Result<()> {
    let mut df = table
        .to_dataframe()
        .context("Failed to build metrics frame")?;

    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;

    Ok(())
}
