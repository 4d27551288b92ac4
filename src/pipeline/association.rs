//! Association between the demographic and target columns
//!
//! A single dataset-wide statistic is chosen from the shape of the two
//! columns: point-biserial correlation when both are binary, Pearson when the
//! demographic column has integer or float storage (integer codes of encoded
//! text included), bias-corrected Cramér's V otherwise.

use std::collections::{HashMap, HashSet};

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::FairnessResult;

/// Statistic used to measure association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationMethod {
    PointBiserial,
    Pearson,
    CramersV,
}

impl std::fmt::Display for AssociationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssociationMethod::PointBiserial => write!(f, "point-biserial"),
            AssociationMethod::Pearson => write!(f, "pearson"),
            AssociationMethod::CramersV => write!(f, "cramers-v"),
        }
    }
}

/// Shape of a column as seen by the method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    /// At most two distinct non-null values
    Binary { numeric: bool },
    /// More than two distinct values stored as integers or floats
    Continuous,
    /// More than two distinct values of any other storage
    Categorical,
}

/// Result of the association step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Association {
    pub method: AssociationMethod,
    /// NaN when the statistic is undefined for this data
    pub value: f64,
}

/// Classify a column from its values and whether it has numeric storage
pub fn classify_column(values: &[Option<f64>], numeric_storage: bool) -> ColumnClass {
    let mut distinct: HashSet<u64> = HashSet::new();
    for v in values.iter().flatten() {
        distinct.insert(key_bits(*v));
        if distinct.len() > 2 {
            break;
        }
    }

    if distinct.len() <= 2 {
        ColumnClass::Binary {
            numeric: numeric_storage,
        }
    } else if numeric_storage {
        ColumnClass::Continuous
    } else {
        ColumnClass::Categorical
    }
}

/// Decision table mapping a (demographic, target) class pair to a method
pub fn select_method(demographic: ColumnClass, target: ColumnClass) -> AssociationMethod {
    match (demographic, target) {
        (ColumnClass::Binary { .. }, ColumnClass::Binary { .. }) => AssociationMethod::PointBiserial,
        (ColumnClass::Binary { numeric: true }, _) | (ColumnClass::Continuous, _) => {
            AssociationMethod::Pearson
        }
        (ColumnClass::Binary { numeric: false }, _) | (ColumnClass::Categorical, _) => {
            AssociationMethod::CramersV
        }
    }
}

/// Compute the association statistic between two columns of a frame.
///
/// `*_numeric` tell whether each column has integer or float storage.
/// Encoded text columns count as integers unless codes are kept categorical.
pub fn estimate_association(
    demographic: &Column,
    target: &Column,
    demographic_numeric: bool,
    target_numeric: bool,
) -> FairnessResult<Association> {
    let d = float_values(demographic)?;
    let t = float_values(target)?;

    let d_class = classify_column(&d, demographic_numeric);
    let t_class = classify_column(&t, target_numeric);
    let method = select_method(d_class, t_class);

    debug!(?d_class, ?t_class, %method, "selected association method");

    let value = match method {
        AssociationMethod::PointBiserial => point_biserial_correlation(&d, &t),
        AssociationMethod::Pearson => pearson_correlation(&d, &t),
        AssociationMethod::CramersV => cramers_v(&ContingencyTable::from_pairs(&d, &t)),
    };

    if value.is_nan() {
        warn!(%method, "association statistic is undefined for this data");
    }

    Ok(Association { method, value })
}

/// Pearson correlation over rows where both values are present.
///
/// NaN with fewer than two complete rows or a constant column.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    compute_pearson(x, y).unwrap_or(f64::NAN)
}

/// Point-biserial correlation: Pearson with one dichotomous variable
pub fn point_biserial_correlation(binary: &[Option<f64>], other: &[Option<f64>]) -> f64 {
    pearson_correlation(binary, other)
}

/// Single-pass Welford algorithm for numerical stability
fn compute_pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut co_moment = 0.0;

    for (x, y) in x.iter().zip(y.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            m2_x += dx * (x - mean_x);
            m2_y += dy * (y - mean_y);
            co_moment += dx * (y - mean_y);
        }
    }

    if n < 2.0 || m2_x == 0.0 || m2_y == 0.0 {
        return None;
    }

    Some(co_moment / (m2_x.sqrt() * m2_y.sqrt()))
}

/// Cross-tabulation of two columns
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    counts: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Build the table from paired observations, skipping incomplete rows.
    /// Rows and columns appear in first-seen order.
    pub fn from_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Self {
        let mut row_index: HashMap<u64, usize> = HashMap::new();
        let mut col_index: HashMap<u64, usize> = HashMap::new();
        let mut cells: Vec<(usize, usize)> = Vec::new();

        for (x, y) in x.iter().zip(y.iter()) {
            if let (Some(x), Some(y)) = (x, y) {
                let next_row = row_index.len();
                let r = *row_index.entry(key_bits(*x)).or_insert(next_row);
                let next_col = col_index.len();
                let c = *col_index.entry(key_bits(*y)).or_insert(next_col);
                cells.push((r, c));
            }
        }

        let mut counts = vec![vec![0.0; col_index.len()]; row_index.len()];
        for (r, c) in cells {
            counts[r][c] += 1.0;
        }

        Self { counts }
    }

    /// Build a table from precomputed counts (rows must have equal length)
    pub fn from_counts(counts: Vec<Vec<f64>>) -> Self {
        Self { counts }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.counts.len();
        let cols = self.counts.first().map_or(0, Vec::len);
        (rows, cols)
    }

    /// Total number of observations
    pub fn total(&self) -> f64 {
        self.counts.iter().flatten().sum()
    }

    pub fn counts(&self) -> &[Vec<f64>] {
        &self.counts
    }

    fn row_totals(&self) -> Vec<f64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    fn col_totals(&self) -> Vec<f64> {
        let (_, cols) = self.shape();
        (0..cols)
            .map(|c| self.counts.iter().map(|row| row[c]).sum())
            .collect()
    }
}

/// Chi-squared statistic of independence.
///
/// Yates' continuity correction is applied with one degree of freedom; a
/// table with no degrees of freedom has statistic 0. NaN when an expected
/// frequency is zero.
pub fn chi_squared(table: &ContingencyTable) -> f64 {
    let (rows, cols) = table.shape();
    let n = table.total();
    if rows == 0 || cols == 0 || n <= 0.0 {
        return f64::NAN;
    }

    let dof = (rows - 1) * (cols - 1);
    if dof == 0 {
        return 0.0;
    }

    let row_totals = table.row_totals();
    let col_totals = table.col_totals();

    let mut chi2 = 0.0;
    for (r, row) in table.counts().iter().enumerate() {
        for (c, &observed) in row.iter().enumerate() {
            let expected = row_totals[r] * col_totals[c] / n;
            if expected == 0.0 {
                return f64::NAN;
            }
            let mut diff = (observed - expected).abs();
            if dof == 1 {
                diff -= diff.min(0.5);
            }
            chi2 += diff * diff / expected;
        }
    }

    chi2
}

/// Bias-corrected Cramér's V.
///
/// NaN when there are at most one observation or the corrected table
/// dimensions leave no room for association.
pub fn cramers_v(table: &ContingencyTable) -> f64 {
    let n = table.total();
    if n <= 1.0 {
        return f64::NAN;
    }

    let chi2 = chi_squared(table);
    if chi2.is_nan() {
        return f64::NAN;
    }

    let (r, k) = table.shape();
    let (r, k) = (r as f64, k as f64);

    let phi2 = chi2 / n;
    let phi2_corr = (phi2 - ((k - 1.0) * (r - 1.0)) / (n - 1.0)).max(0.0);
    let r_corr = r - (r - 1.0).powi(2) / (n - 1.0);
    let k_corr = k - (k - 1.0).powi(2) / (n - 1.0);

    let denominator = (k_corr - 1.0).min(r_corr - 1.0);
    if denominator <= 0.0 {
        return f64::NAN;
    }

    (phi2_corr / denominator).sqrt()
}

/// Cast a column to Float64 values, treating NaN like null
pub(crate) fn float_values(col: &Column) -> FairnessResult<Vec<Option<f64>>> {
    let cast = col.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Hashable key for a float, with -0.0 folded into 0.0
pub(crate) fn key_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}
