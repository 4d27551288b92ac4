//! Fairness scoring: parity difference, disparate impact and the weighted score
//!
//! [`analyze_fairness`] is the end-to-end entry point. It is a pure function
//! of the frame and the column selection: encode, aggregate, estimate the
//! association once, score every non-reference group, build the table.

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::association::estimate_association;
use super::encoder::{encode_categoricals, EncodingMap};
use super::error::{FairnessError, FairnessResult};
use super::groups::{aggregate_group_means, GroupMeans};
use super::metrics::{build_metrics_table, GroupMetrics, MetricsTable};

/// Column selection and policy for one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct FairnessConfig {
    /// Protected attribute defining the groups
    pub demographic: String,
    /// Outcome column
    pub target: String,
    /// Keep encoded text columns categorical when choosing the association
    /// method. Off by default: integer codes count as integer storage, so a
    /// text demographic gets Pearson on its codes.
    pub codes_as_categorical: bool,
}

impl FairnessConfig {
    pub fn new(demographic: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            demographic: demographic.into(),
            target: target.into(),
            codes_as_categorical: false,
        }
    }

    pub fn with_codes_as_categorical(mut self, codes_as_categorical: bool) -> Self {
        self.codes_as_categorical = codes_as_categorical;
        self
    }
}

/// Everything an analysis run produces
#[derive(Debug, Clone)]
pub struct FairnessReport {
    pub table: MetricsTable,
    pub encodings: EncodingMap,
}

/// mean(T | g) - mean(T | r)
pub fn statistical_parity_difference(group_mean: f64, reference_mean: f64) -> f64 {
    group_mean - reference_mean
}

/// mean(T | g) / mean(T | r), NaN when the reference mean is zero
pub fn disparate_impact(group_mean: f64, reference_mean: f64) -> f64 {
    if reference_mean == 0.0 {
        f64::NAN
    } else {
        group_mean / reference_mean
    }
}

/// |SPD| * (1 - |correlation|).
///
/// |correlation| is clamped to 1 so a numerically out-of-range statistic
/// cannot turn the score negative. NaN in either input gives NaN.
pub fn weighted_fairness_score(spd: f64, correlation: f64) -> f64 {
    if spd.is_nan() || correlation.is_nan() {
        return f64::NAN;
    }
    spd.abs() * (1.0 - correlation.abs().min(1.0))
}

/// Score every group except the reference against the reference group.
///
/// The same dataset-wide `correlation` is written into every record.
pub fn score_groups(means: &GroupMeans, correlation: f64) -> Vec<GroupMetrics> {
    let Some(reference) = means.reference() else {
        return Vec::new();
    };

    means
        .comparisons()
        .map(|stats| {
            let spd = statistical_parity_difference(stats.mean, reference.mean);
            let di = disparate_impact(stats.mean, reference.mean);
            GroupMetrics {
                group: stats.group.key,
                label: stats.group.label.clone(),
                statistical_parity_difference: spd,
                disparate_impact: di,
                correlation,
                weighted_fairness_score: weighted_fairness_score(spd, correlation),
            }
        })
        .collect()
}

/// Run the full fairness analysis on `df`.
///
/// Fails when a selected column is missing, the demographic column has no
/// groups, or the target cannot be averaged. A single group yields an empty
/// table.
pub fn analyze_fairness(df: &DataFrame, config: &FairnessConfig) -> FairnessResult<FairnessReport> {
    require_column(df, &config.demographic)?;
    require_column(df, &config.target)?;

    let encoded = encode_categoricals(df)?;
    let demographic = encoded.frame.column(&config.demographic)?;
    let target = encoded.frame.column(&config.target)?;

    let means = aggregate_group_means(
        demographic,
        target,
        encoded.encodings.get(&config.demographic),
    )?;

    let reference = means
        .reference()
        .ok_or_else(|| FairnessError::NoGroups {
            column: config.demographic.clone(),
        })?
        .group
        .clone();

    debug!(
        groups = means.len(),
        reference = %reference.label,
        "aggregated target means by group"
    );

    let numeric = |name: &str| {
        has_numeric_storage(df, &encoded.encodings, name, config.codes_as_categorical)
    };
    let association = estimate_association(
        demographic,
        target,
        numeric(&config.demographic),
        numeric(&config.target),
    )?;

    if means.len() == 1 {
        warn!(
            column = %config.demographic,
            "only one group present, nothing to compare against the reference"
        );
    }
    if means.reference().is_some_and(|r| r.mean == 0.0) && means.len() > 1 {
        warn!("reference group mean is zero, disparate impact is undefined");
    }

    let rows = score_groups(&means, association.value);

    info!(
        groups = rows.len(),
        method = %association.method,
        correlation = association.value,
        "fairness metrics computed"
    );

    Ok(FairnessReport {
        table: build_metrics_table(reference, association, rows),
        encodings: encoded.encodings,
    })
}

fn require_column(df: &DataFrame, name: &str) -> FairnessResult<()> {
    if df.get_column_index(name).is_some() {
        return Ok(());
    }
    Err(FairnessError::ColumnNotFound {
        column: name.to_string(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Integer/float storage of the column; encoded text holds `UInt32` codes
fn has_numeric_storage(
    source: &DataFrame,
    encodings: &EncodingMap,
    name: &str,
    codes_as_categorical: bool,
) -> bool {
    if encodings.is_encoded(name) {
        return !codes_as_categorical;
    }
    source
        .column(name)
        .map(|col| col.dtype().is_primitive_numeric())
        .unwrap_or(false)
}
