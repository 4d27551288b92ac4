//! Unit tests for association estimation

use fairlens::pipeline::{
    cramers_v, encode_categoricals, estimate_association, pearson_correlation,
    point_biserial_correlation, AssociationMethod, ContingencyTable,
};
use polars::prelude::*;
use rand::{Rng, SeedableRng};

#[path = "common/mod.rs"]
mod common;

fn random_pairs(n: usize, x_levels: usize, y_levels: usize, seed: u64) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let x = (0..n).map(|_| Some(rng.gen_range(0..x_levels) as f64)).collect();
    let y = (0..n).map(|_| Some(rng.gen_range(0..y_levels) as f64)).collect();
    (x, y)
}

#[test]
fn test_cramers_v_within_unit_interval() {
    for seed in 0..20 {
        let (x, y) = random_pairs(100, 2 + (seed as usize % 4), 2 + (seed as usize % 3), seed);
        let table = ContingencyTable::from_pairs(&x, &y);
        let (r, k) = table.shape();

        if r < 2 || k < 2 {
            continue;
        }

        let v = cramers_v(&table);
        assert!(
            (0.0..=1.0).contains(&v),
            "Cramér's V should be in [0, 1], got {} for a {}x{} table",
            v,
            r,
            k
        );
    }
}

#[test]
fn test_cramers_v_strong_association() {
    let x: Vec<Option<f64>> = (0..300).map(|i| Some((i % 3) as f64)).collect();
    let y = x.clone();

    let v = cramers_v(&ContingencyTable::from_pairs(&x, &y));

    common::assert_close(v, 1.0, 1e-9);
}

#[test]
fn test_cramers_v_undefined_for_too_many_levels() {
    // Every target value is unique: the corrected column count collapses to 1
    let x: Vec<Option<f64>> = (0..6).map(|i| Some((i % 2) as f64)).collect();
    let y: Vec<Option<f64>> = (0..6).map(|i| Some(i as f64)).collect();

    assert!(cramers_v(&ContingencyTable::from_pairs(&x, &y)).is_nan());
}

#[test]
fn test_pearson_within_unit_interval() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let x: Vec<Option<f64>> = (0..50).map(|_| Some(rng.gen::<f64>())).collect();
        let y: Vec<Option<f64>> = (0..50).map(|_| Some(rng.gen::<f64>() * 10.0)).collect();

        let r = pearson_correlation(&x, &y);
        assert!((-1.0..=1.0).contains(&r), "Pearson out of range: {}", r);

        let pb = point_biserial_correlation(
            &x.iter().map(|v| v.map(|x| (x > 0.5) as u8 as f64)).collect::<Vec<_>>(),
            &y,
        );
        assert!(pb.is_nan() || (-1.0..=1.0).contains(&pb));
    }
}

#[test]
fn test_estimate_on_encoded_frame() {
    let df = common::create_binary_text_dataframe();
    let encoded = encode_categoricals(&df).unwrap();

    let association = estimate_association(
        encoded.frame.column("group").unwrap(),
        encoded.frame.column("outcome").unwrap(),
        false,
        false,
    )
    .unwrap();

    assert_eq!(association.method, AssociationMethod::PointBiserial);
    common::assert_close(association.value, -2.0 / 3.0, 1e-12);
}

#[test]
fn test_estimate_constant_target_is_nan() {
    let df = df! {
        "d" => [0i64, 1, 0, 1],
        "t" => [1.0f64, 1.0, 1.0, 1.0],
    }
    .unwrap();

    let association = estimate_association(
        df.column("d").unwrap(),
        df.column("t").unwrap(),
        true,
        true,
    )
    .unwrap();

    assert_eq!(association.method, AssociationMethod::PointBiserial);
    assert!(association.value.is_nan());
}

#[test]
fn test_estimate_ignores_float_nan() {
    let df = df! {
        "d" => [1.0f64, 2.0, 3.0, f64::NAN, 4.0],
        "t" => [2.0f64, 4.0, 6.0, 100.0, 8.0],
    }
    .unwrap();

    let association = estimate_association(
        df.column("d").unwrap(),
        df.column("t").unwrap(),
        true,
        true,
    )
    .unwrap();

    assert_eq!(association.method, AssociationMethod::Pearson);
    common::assert_close(association.value, 1.0, 1e-12);
}
