// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use mse_estimators::{
    ApproximateEntropy, EmbeddingParams, EntropyEstimator, SampleEntropy, phi_divide, sample_phi,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

/// Dyadic-rational series: every value is i/16 with small integer i, so
/// shifts and doublings below stay exact in f64 and match counts are
/// bit-stable under them.
fn dyadic_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-64i32..64).prop_map(|i| f64::from(i) / 16.0), 24..64)
}

fn dyadic_tolerance() -> impl Strategy<Value = f64> {
    (1i32..16).prop_map(|i| f64::from(i) / 16.0)
}

fn arbitrary_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 24..64)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        ..ProptestConfig::default()
    })]

    #[test]
    fn phi_ratios_are_probabilities_and_monotone(
        series in arbitrary_series(),
        tolerance in 0.0f64..50.0,
    ) {
        let phi = sample_phi(&series, 1, 2, tolerance, false)
            .expect("series is long enough to embed");
        prop_assert!((0.0..=1.0).contains(&phi.m));
        prop_assert!((0.0..=1.0).contains(&phi.m_plus_1));
        // A match at m+1 is a match at m, so the extended ratio never wins.
        prop_assert!(phi.m_plus_1 <= phi.m);
    }

    #[test]
    fn fuzzy_phi_ratios_are_probabilities(
        series in arbitrary_series(),
        tolerance in 0.0f64..50.0,
    ) {
        let phi = sample_phi(&series, 1, 2, tolerance, true)
            .expect("series is long enough to embed");
        prop_assert!((0.0..=1.0).contains(&phi.m));
        prop_assert!((0.0..=1.0).contains(&phi.m_plus_1));
    }

    #[test]
    fn sample_phi_is_shift_invariant(
        series in dyadic_series(),
        tolerance in dyadic_tolerance(),
        shift in -8i32..8,
    ) {
        let shifted: Vec<f64> = series.iter().map(|v| v + f64::from(shift)).collect();
        let base = sample_phi(&series, 1, 2, tolerance, false).expect("base phi");
        let moved = sample_phi(&shifted, 1, 2, tolerance, false).expect("shifted phi");
        prop_assert_eq!(base.m, moved.m);
        prop_assert_eq!(base.m_plus_1, moved.m_plus_1);
    }

    #[test]
    fn sample_phi_is_scale_invariant_with_scaled_tolerance(
        series in dyadic_series(),
        tolerance in dyadic_tolerance(),
    ) {
        let doubled: Vec<f64> = series.iter().map(|v| v * 2.0).collect();
        let base = sample_phi(&series, 1, 2, tolerance, false).expect("base phi");
        let scaled = sample_phi(&doubled, 1, 2, tolerance * 2.0, false).expect("scaled phi");
        prop_assert_eq!(base.m, scaled.m);
        prop_assert_eq!(base.m_plus_1, scaled.m_plus_1);
    }

    #[test]
    fn approximate_entropy_is_always_finite(
        series in arbitrary_series(),
        tolerance in 0.0f64..50.0,
    ) {
        let params = EmbeddingParams { tolerance, ..EmbeddingParams::default() };
        let estimate = ApproximateEntropy
            .estimate(&series, &params)
            .expect("series is long enough to embed");
        prop_assert!(estimate.value.is_finite());
    }

    #[test]
    fn sample_entropy_value_equals_phi_divide(
        series in arbitrary_series(),
        tolerance in 0.0f64..50.0,
    ) {
        let params = EmbeddingParams { tolerance, ..EmbeddingParams::default() };
        let estimate = SampleEntropy
            .estimate(&series, &params)
            .expect("series is long enough to embed");
        let direct = phi_divide(&estimate.phi);
        if direct.is_nan() {
            prop_assert!(estimate.value.is_nan());
        } else {
            prop_assert_eq!(estimate.value, direct);
        }
    }

    #[test]
    fn constant_series_has_zero_entropy_under_both_estimators(
        value in -50.0f64..50.0,
        len in 24usize..64,
    ) {
        let series = vec![value; len];
        let params = EmbeddingParams { tolerance: 0.0, ..EmbeddingParams::default() };
        let sampen = SampleEntropy
            .estimate(&series, &params)
            .expect("constant series estimate");
        let apen = ApproximateEntropy
            .estimate(&series, &params)
            .expect("constant series estimate");
        prop_assert_eq!(sampen.value, 0.0);
        prop_assert!(apen.value.abs() < 1e-12);
    }
}
