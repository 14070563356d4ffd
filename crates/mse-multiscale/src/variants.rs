// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Per-scale variant combination: the numerical heart of the pipeline.
//!
//! The three coarse-graining/averaging strategies differ in when the mean
//! is taken relative to the estimator's logarithm:
//!
//! - plain evaluates one coarse-grained series;
//! - composite averages finished (post-log) entropies across the
//!   time-shifted stack;
//! - refined-composite averages the raw phi ratios across the stack first
//!   and applies the log-ratio step once.
//!
//! The fuzzy toggle is orthogonal and only forwarded to the estimators.

use crate::coarse::{coarse_grain, coarse_grain_stack};
use crate::pipeline::MultiscaleConfig;
use mse_core::{MseError, stats};
use mse_estimators::{EmbeddingParams, EntropyEstimator, PhiPair, phi_divide, sample_phi};

/// The closed set of combination strategies.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Standard MSE: one coarse-grained series per scale.
    #[default]
    Plain,
    /// CMSE: mean of per-row entropies over the time-shifted stack.
    Composite,
    /// RCMSE: phi ratios averaged across rows before the log-ratio step.
    RefinedComposite,
}

impl Variant {
    /// Resolves the two boolean axes of the public interface. Refined
    /// implies the composite coarse-graining structure.
    pub fn from_flags(composite: bool, refined: bool) -> Self {
        if refined {
            Self::RefinedComposite
        } else if composite {
            Self::Composite
        } else {
            Self::Plain
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "mse",
            Self::Composite => "cmse",
            Self::RefinedComposite => "rcmse",
        }
    }
}

/// Minimum sample count for a statistically meaningful estimate at the
/// given embedding dimension (Liu et al. 2012): 10^dimension, applied as a
/// hard floor, not a warning.
fn min_sample_floor(dimension: usize) -> usize {
    u32::try_from(dimension)
        .ok()
        .and_then(|exp| 10usize.checked_pow(exp))
        .unwrap_or(usize::MAX)
}

/// Shortest series the estimators can embed: `n_t = len - dimension >= 2`
/// at delay 1. Rows below this are excluded from averaging, never coerced.
fn min_embed_len(dimension: usize) -> usize {
    dimension + 2
}

/// Combines one scale factor into its per-scale value.
///
/// Structural failures (impossible shapes reaching this point) propagate
/// as errors; statistical degeneracy degrades to NaN.
pub(crate) fn combine_at_scale<E>(
    signal: &[f64],
    scale: usize,
    config: &MultiscaleConfig,
    tolerance: f64,
    estimator: &E,
) -> Result<f64, MseError>
where
    E: EntropyEstimator + ?Sized,
{
    let params = EmbeddingParams {
        delay: 1,
        dimension: config.dimension,
        tolerance,
        fuzzy: config.fuzzy,
    };

    match config.variant {
        Variant::Plain => plain(signal, scale, config, &params, estimator),
        Variant::Composite => composite(signal, scale, config, &params, estimator),
        Variant::RefinedComposite => refined_composite(signal, scale, config, &params),
    }
}

fn plain<E>(
    signal: &[f64],
    scale: usize,
    config: &MultiscaleConfig,
    params: &EmbeddingParams,
    estimator: &E,
) -> Result<f64, MseError>
where
    E: EntropyEstimator + ?Sized,
{
    let coarse = coarse_grain(signal, scale, config.coarse)?;
    if coarse.len() < min_sample_floor(config.dimension) {
        return Ok(f64::NAN);
    }
    Ok(estimator.estimate(&coarse, params)?.value)
}

fn composite<E>(
    signal: &[f64],
    scale: usize,
    config: &MultiscaleConfig,
    params: &EmbeddingParams,
    estimator: &E,
) -> Result<f64, MseError>
where
    E: EntropyEstimator + ?Sized,
{
    let stack = coarse_grain_stack(signal, scale)?;
    let total: usize = stack.iter().map(Vec::len).sum();
    if total < min_sample_floor(config.dimension) {
        return Ok(f64::NAN);
    }

    let mut row_values = Vec::with_capacity(stack.len());
    for row in &stack {
        if row.len() < min_embed_len(config.dimension) {
            continue;
        }
        row_values.push(estimator.estimate(row, params)?.value);
    }

    // Non-finite rows drop out; an empty remainder is NaN, never a zero
    // mean.
    Ok(stats::robust_mean(&row_values))
}

fn refined_composite(
    signal: &[f64],
    scale: usize,
    config: &MultiscaleConfig,
    params: &EmbeddingParams,
) -> Result<f64, MseError> {
    let stack = coarse_grain_stack(signal, scale)?;
    let total: usize = stack.iter().map(Vec::len).sum();
    if total < min_sample_floor(config.dimension) {
        return Ok(f64::NAN);
    }

    let mut phi_m = Vec::with_capacity(stack.len());
    let mut phi_m1 = Vec::with_capacity(stack.len());
    for row in &stack {
        if row.len() < min_embed_len(config.dimension) {
            continue;
        }
        let phi = sample_phi(row, params.delay, params.dimension, params.tolerance, params.fuzzy)?;
        phi_m.push(phi.m);
        phi_m1.push(phi.m_plus_1);
    }

    let averaged = PhiPair {
        m: stats::robust_mean(&phi_m),
        m_plus_1: stats::robust_mean(&phi_m1),
    };
    Ok(phi_divide(&averaged))
}

#[cfg(test)]
mod tests {
    use super::{Variant, combine_at_scale, min_sample_floor};
    use crate::pipeline::MultiscaleConfig;
    use mse_estimators::{EmbeddingParams, EntropyEstimator, SampleEntropy};

    fn config(variant: Variant) -> MultiscaleConfig {
        MultiscaleConfig {
            variant,
            ..MultiscaleConfig::default()
        }
    }

    fn ramp_noise(n: usize) -> Vec<f64> {
        // Deterministic, aperiodic, non-uniform across phase offsets.
        (0..n).map(|i| (i as f64 * 0.61803398875).fract() + (i as f64 * 0.01)).collect()
    }

    #[test]
    fn from_flags_encodes_precedence() {
        assert_eq!(Variant::from_flags(false, false), Variant::Plain);
        assert_eq!(Variant::from_flags(true, false), Variant::Composite);
        assert_eq!(Variant::from_flags(false, true), Variant::RefinedComposite);
        assert_eq!(Variant::from_flags(true, true), Variant::RefinedComposite);
    }

    #[test]
    fn sample_floor_is_ten_to_the_dimension() {
        assert_eq!(min_sample_floor(1), 10);
        assert_eq!(min_sample_floor(2), 100);
        assert_eq!(min_sample_floor(3), 1000);
        // Absurd dimensions saturate instead of overflowing.
        assert_eq!(min_sample_floor(64), usize::MAX);
    }

    #[test]
    fn plain_at_scale_one_equals_direct_estimate() {
        let signal = ramp_noise(240);
        let cfg = config(Variant::Plain);
        let combined = combine_at_scale(&signal, 1, &cfg, 0.2, &SampleEntropy)
            .expect("combine should work");
        let direct = SampleEntropy
            .estimate(
                &signal,
                &EmbeddingParams {
                    tolerance: 0.2,
                    ..EmbeddingParams::default()
                },
            )
            .expect("direct estimate")
            .value;
        assert_eq!(combined, direct);
    }

    #[test]
    fn composite_at_scale_one_equals_plain() {
        let signal = ramp_noise(240);
        let plain = combine_at_scale(&signal, 1, &config(Variant::Plain), 0.2, &SampleEntropy)
            .expect("plain combine");
        let composite =
            combine_at_scale(&signal, 1, &config(Variant::Composite), 0.2, &SampleEntropy)
                .expect("composite combine");
        assert_eq!(plain, composite);
    }

    #[test]
    fn refined_at_scale_one_equals_plain() {
        // One row means nothing to average: the refined path reduces to the
        // plain log-ratio of that row's phi pair.
        let signal = ramp_noise(240);
        let plain = combine_at_scale(&signal, 1, &config(Variant::Plain), 0.2, &SampleEntropy)
            .expect("plain combine");
        let refined = combine_at_scale(
            &signal,
            1,
            &config(Variant::RefinedComposite),
            0.2,
            &SampleEntropy,
        )
        .expect("refined combine");
        assert!((plain - refined).abs() < 1e-12);
    }

    #[test]
    fn undersized_series_hits_the_liu_floor() {
        // 60 samples at dimension 2 sits below the 100-sample floor.
        let signal = ramp_noise(60);
        for variant in [Variant::Plain, Variant::Composite, Variant::RefinedComposite] {
            let value = combine_at_scale(&signal, 1, &config(variant), 0.2, &SampleEntropy)
                .expect("combine should work");
            assert!(value.is_nan(), "{variant:?} must gate to NaN");
        }
    }

    #[test]
    fn refined_equals_composite_on_identical_rows() {
        // A period-2 signal makes both phase-shifted rows identical, so
        // mean-of-logs and log-of-means coincide.
        let signal: Vec<f64> = (0..400).map(|i| f64::from(i % 2)).collect();
        let composite =
            combine_at_scale(&signal, 2, &config(Variant::Composite), 0.1, &SampleEntropy)
                .expect("composite combine");
        let refined = combine_at_scale(
            &signal,
            2,
            &config(Variant::RefinedComposite),
            0.1,
            &SampleEntropy,
        )
        .expect("refined combine");
        assert!((composite - refined).abs() < 1e-12);
    }

    #[test]
    fn refined_differs_from_composite_on_non_uniform_rows() {
        let signal = ramp_noise(600);
        let composite =
            combine_at_scale(&signal, 3, &config(Variant::Composite), 0.1, &SampleEntropy)
                .expect("composite combine");
        let refined = combine_at_scale(
            &signal,
            3,
            &config(Variant::RefinedComposite),
            0.1,
            &SampleEntropy,
        )
        .expect("refined combine");
        assert!(composite.is_finite());
        assert!(refined.is_finite());
        assert!(
            (composite - refined).abs() > 1e-9,
            "average-then-log must differ from mean-of-logs: {composite} vs {refined}"
        );
    }
}
