//! Per-group aggregation of the target column

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::association::{float_values, key_bits};
use super::encoder::ColumnEncoding;
use super::error::{FairnessError, FairnessResult};

/// A distinct value of the demographic column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Value after encoding, as a float
    pub key: f64,
    /// Original text for encoded columns, the value itself otherwise
    pub label: String,
}

/// Target statistics of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub group: Group,
    /// Mean of the non-null targets, NaN if there are none
    pub mean: f64,
    /// Rows in the group
    pub rows: usize,
}

/// Group means in first-appearance order of the demographic values
#[derive(Debug, Clone, Default)]
pub struct GroupMeans {
    groups: Vec<GroupStats>,
}

impl GroupMeans {
    /// First group encountered; the baseline for every comparison
    pub fn reference(&self) -> Option<&GroupStats> {
        self.groups.first()
    }

    /// Every group except the reference, in enumeration order
    pub fn comparisons(&self) -> impl Iterator<Item = &GroupStats> {
        self.groups.iter().skip(1)
    }

    pub fn get(&self, key: f64) -> Option<&GroupStats> {
        self.groups
            .iter()
            .find(|g| key_bits(g.group.key) == key_bits(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupStats> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Whether a target column can be averaged
pub fn is_averageable(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)
}

/// Partition by `demographic` and average `target` within each partition.
///
/// Rows with a null demographic value belong to no group. `encoding` is the
/// demographic column's encoding, if it was produced from text, and is used
/// for group labels.
pub fn aggregate_group_means(
    demographic: &Column,
    target: &Column,
    encoding: Option<&ColumnEncoding>,
) -> FairnessResult<GroupMeans> {
    if !is_averageable(target.dtype()) {
        return Err(FairnessError::NonNumericTarget {
            column: target.name().to_string(),
            dtype: target.dtype().clone(),
        });
    }

    let demographic_dtype = demographic.dtype().clone();
    if !is_averageable(&demographic_dtype) {
        return Err(FairnessError::UnsupportedDemographic {
            column: demographic.name().to_string(),
            dtype: demographic_dtype,
        });
    }

    let keys = float_values(demographic)?;
    let targets = float_values(target)?;

    let mut index: HashMap<u64, usize> = HashMap::new();
    // (key, sum, observed targets, rows)
    let mut accumulators: Vec<(f64, f64, usize, usize)> = Vec::new();

    for (key, value) in keys.iter().zip(targets.iter()) {
        let Some(key) = key else {
            continue;
        };

        let slot = *index.entry(key_bits(*key)).or_insert_with(|| {
            accumulators.push((*key, 0.0, 0, 0));
            accumulators.len() - 1
        });

        let acc = &mut accumulators[slot];
        acc.3 += 1;
        if let Some(v) = value {
            acc.1 += v;
            acc.2 += 1;
        }
    }

    let groups = accumulators
        .into_iter()
        .map(|(key, sum, observed, rows)| GroupStats {
            group: Group {
                key,
                label: group_label(key, &demographic_dtype, encoding),
            },
            mean: if observed == 0 {
                f64::NAN
            } else {
                sum / observed as f64
            },
            rows,
        })
        .collect();

    Ok(GroupMeans { groups })
}

fn group_label(key: f64, dtype: &DataType, encoding: Option<&ColumnEncoding>) -> String {
    if let Some(value) = encoding.and_then(|enc| enc.value_of(key as u32)) {
        return value.to_string();
    }
    match dtype {
        DataType::Boolean => (key != 0.0).to_string(),
        _ => format!("{}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_in_first_appearance_order() {
        let df = df! {
            "d" => [3i64, 1, 3, 2, 1],
            "t" => [1.0f64, 0.0, 0.0, 1.0, 1.0],
        }
        .unwrap();

        let means =
            aggregate_group_means(df.column("d").unwrap(), df.column("t").unwrap(), None).unwrap();

        let keys: Vec<f64> = means.iter().map(|g| g.group.key).collect();
        assert_eq!(keys, vec![3.0, 1.0, 2.0]);
        assert_eq!(means.reference().unwrap().group.key, 3.0);
        assert_eq!(means.get(3.0).unwrap().mean, 0.5);
        assert_eq!(means.get(1.0).unwrap().mean, 0.5);
        assert_eq!(means.get(2.0).unwrap().rows, 1);
        assert_eq!(means.comparisons().count(), 2);
    }

    #[test]
    fn test_null_targets_are_skipped() {
        let df = df! {
            "d" => [0i64, 0, 1, 1],
            "t" => [Some(2.0f64), None, None, None],
        }
        .unwrap();

        let means =
            aggregate_group_means(df.column("d").unwrap(), df.column("t").unwrap(), None).unwrap();

        assert_eq!(means.get(0.0).unwrap().mean, 2.0);
        assert_eq!(means.get(0.0).unwrap().rows, 2);
        assert!(means.get(1.0).unwrap().mean.is_nan());
    }

    #[test]
    fn test_null_demographic_rows_have_no_group() {
        let df = df! {
            "d" => [None, Some(1i64), Some(1)],
            "t" => [5.0f64, 1.0, 3.0],
        }
        .unwrap();

        let means =
            aggregate_group_means(df.column("d").unwrap(), df.column("t").unwrap(), None).unwrap();

        assert_eq!(means.len(), 1);
        assert_eq!(means.reference().unwrap().mean, 2.0);
    }

    #[test]
    fn test_labels_decode_encoded_groups() {
        let df = df! {
            "d" => [1u32, 0, 1],
            "t" => [1i32, 0, 1],
        }
        .unwrap();
        let encoding = ColumnEncoding::fit(["female", "male"]);

        let means = aggregate_group_means(
            df.column("d").unwrap(),
            df.column("t").unwrap(),
            Some(&encoding),
        )
        .unwrap();

        let labels: Vec<&str> = means.iter().map(|g| g.group.label.as_str()).collect();
        assert_eq!(labels, vec!["male", "female"]);
    }

    #[test]
    fn test_boolean_target_is_averaged() {
        let df = df! {
            "d" => [0i64, 0, 1, 1],
            "t" => [true, false, true, true],
        }
        .unwrap();

        let means =
            aggregate_group_means(df.column("d").unwrap(), df.column("t").unwrap(), None).unwrap();

        assert_eq!(means.get(0.0).unwrap().mean, 0.5);
        assert_eq!(means.get(1.0).unwrap().mean, 1.0);
    }

    #[test]
    fn test_non_numeric_target_is_rejected() {
        let df = df! {
            "d" => [0i64, 1],
            "t" => ["yes", "no"],
        }
        .unwrap();

        let err = aggregate_group_means(df.column("d").unwrap(), df.column("t").unwrap(), None)
            .unwrap_err();
        assert!(matches!(err, FairnessError::NonNumericTarget { .. }));
    }
}
