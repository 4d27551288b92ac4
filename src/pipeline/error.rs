//! Error types for the fairness pipeline.
//!
//! Configuration and data-type problems abort an analysis run. Arithmetic
//! edge cases (zero reference mean, degenerate contingency tables, too few
//! observations) never show up here: they surface as NaN metric values.

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Errors that abort a fairness analysis run.
#[derive(Debug, Error)]
pub enum FairnessError {
    /// A selected column is not present in the dataset.
    #[error("Column '{column}' not found in dataset. Available columns: {available:?}")]
    ColumnNotFound {
        /// Name that was requested
        column: String,
        /// Columns the dataset actually has
        available: Vec<String>,
    },

    /// The demographic column has no non-null values, so there is no
    /// reference group to compare against.
    #[error("Demographic column '{column}' contains no groups (no non-null values)")]
    NoGroups { column: String },

    /// The target column cannot be averaged even after encoding.
    #[error("Target column '{column}' must be numeric after encoding, found {dtype}")]
    NonNumericTarget { column: String, dtype: DataType },

    /// The demographic column cannot be turned into group keys.
    #[error("Demographic column '{column}' has unsupported type {dtype}")]
    UnsupportedDemographic { column: String, dtype: DataType },

    /// Underlying data frame failure.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl FairnessError {
    /// Whether the error stems from the caller's column selection rather
    /// than from the data itself.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FairnessError::ColumnNotFound { .. } | FairnessError::NoGroups { .. }
        )
    }
}

pub type FairnessResult<T> = std::result::Result<T, FairnessError>;
