//! Per-group fairness records and the table that collects them

use polars::prelude::*;
use serde::Serialize;

use super::association::{Association, AssociationMethod};
use super::groups::Group;

pub const GROUP_COLUMN: &str = "Group";
pub const LABEL_COLUMN: &str = "Label";
pub const SPD_COLUMN: &str = "Statistical Parity Difference";
pub const DI_COLUMN: &str = "Disparate Impact";
pub const CORRELATION_COLUMN: &str = "Correlation";
pub const SCORE_COLUMN: &str = "Weighted Fairness Score";

/// Fairness metrics of one non-reference group. NaN marks an undefined value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    /// Encoded demographic value
    pub group: f64,
    pub label: String,
    pub statistical_parity_difference: f64,
    pub disparate_impact: f64,
    /// Dataset-wide association between demographic and target. Identical
    /// in every record: it is not a per-group comparison against the
    /// reference group.
    pub correlation: f64,
    pub weighted_fairness_score: f64,
}

/// Ordered result of a fairness analysis
#[derive(Debug, Clone, Serialize)]
pub struct MetricsTable {
    reference: Group,
    association: Association,
    rows: Vec<GroupMetrics>,
}

/// Assemble records, already in enumeration order, into a table
pub fn build_metrics_table(
    reference: Group,
    association: Association,
    rows: Vec<GroupMetrics>,
) -> MetricsTable {
    MetricsTable {
        reference,
        association,
        rows,
    }
}

impl MetricsTable {
    pub fn rows(&self) -> &[GroupMetrics] {
        &self.rows
    }

    pub fn reference(&self) -> &Group {
        &self.reference
    }

    pub fn association(&self) -> Association {
        self.association
    }

    pub fn method(&self) -> AssociationMethod {
        self.association.method
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record of a group by its encoded value
    pub fn get(&self, group: f64) -> Option<&GroupMetrics> {
        self.rows.iter().find(|r| r.group == group)
    }

    /// Full-precision frame with one row per group, for export
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let column = |name: &str, f: fn(&GroupMetrics) -> f64| {
            Column::new(name.into(), self.rows.iter().map(f).collect::<Vec<f64>>())
        };

        let labels: Vec<&str> = self.rows.iter().map(|r| r.label.as_str()).collect();

        DataFrame::new(vec![
            column(GROUP_COLUMN, |r| r.group),
            Column::new(LABEL_COLUMN.into(), labels),
            column(SPD_COLUMN, |r| r.statistical_parity_difference),
            column(DI_COLUMN, |r| r.disparate_impact),
            column(CORRELATION_COLUMN, |r| r.correlation),
            column(SCORE_COLUMN, |r| r.weighted_fairness_score),
        ])
    }
}
