//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::FairnessConfig;

/// fairlens - Measure group fairness of an outcome across a demographic attribute
#[derive(Parser, Debug)]
#[command(name = "fairlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Demographic (protected) column defining the groups.
    /// If not provided, will be selected interactively from available columns.
    #[arg(short, long)]
    pub demographic: Option<String>,

    /// Target (outcome) column averaged within each group.
    /// If not provided, will be selected interactively from available columns.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Number of rows shown in the data preview (0 disables the preview)
    #[arg(long, default_value = "20")]
    pub preview: usize,

    /// Keep integer codes of text columns categorical when choosing the
    /// association statistic (Cramér's V instead of Pearson on codes)
    #[arg(long, default_value = "false")]
    pub codes_as_categorical: bool,

    /// Write the metrics table next to the input as <name>_fairness.csv
    /// and <name>_fairness.json
    #[arg(long, default_value = "false")]
    pub save: bool,

    /// Write the metrics table to this CSV file
    #[arg(long, value_parser = validate_csv_path)]
    pub csv_output: Option<PathBuf>,

    /// Write the fairness report to this JSON file
    #[arg(long, value_parser = validate_json_path)]
    pub json_output: Option<PathBuf>,

    /// Skip interactive column selection and confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG overrides this flag.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Get the input path, if one was given
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// CSV output path: explicit `--csv-output`, or derived from the input with `--save`
    pub fn csv_output_path(&self) -> Option<PathBuf> {
        self.csv_output
            .clone()
            .or_else(|| self.derived_output("csv"))
    }

    /// JSON output path: explicit `--json-output`, or derived from the input with `--save`
    pub fn json_output_path(&self) -> Option<PathBuf> {
        self.json_output
            .clone()
            .or_else(|| self.derived_output("json"))
    }

    /// Analysis configuration once both columns are known
    pub fn fairness_config(&self, demographic: &str, target: &str) -> FairnessConfig {
        FairnessConfig::new(demographic, target)
            .with_codes_as_categorical(self.codes_as_categorical)
    }

    fn derived_output(&self, extension: &str) -> Option<PathBuf> {
        if !self.save {
            return None;
        }
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        Some(parent.join(format!("{}_fairness.{}", stem, extension)))
    }
}

fn validate_extension(s: &str, expected: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == expected {
        Ok(path)
    } else {
        Err(format!("'{}' must have a .{} extension", s, expected))
    }
}

/// Validator for csv_output parameter
fn validate_csv_path(s: &str) -> Result<PathBuf, String> {
    validate_extension(s, "csv")
}

/// Validator for json_output parameter
fn validate_json_path(s: &str) -> Result<PathBuf, String> {
    validate_extension(s, "json")
}
