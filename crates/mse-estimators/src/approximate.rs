// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::{EmbeddingParams, EntropyEstimate, EntropyEstimator};
use crate::phi::{PhiPair, membership};
use mse_core::MseError;

/// Approximate entropy (Pincus 1991).
///
/// ApEn = Phi_m - Phi_{m+1}, where Phi_m is the mean log of self-match
/// inclusive template match frequencies. Because every template matches
/// itself, the frequencies are strictly positive and ApEn is always finite.
/// The reported pair records (Phi_m, Phi_{m+1}) as the auxiliary info.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApproximateEntropy;

impl EntropyEstimator for ApproximateEntropy {
    fn name(&self) -> &'static str {
        "approximate_entropy"
    }

    fn estimate(
        &self,
        series: &[f64],
        params: &EmbeddingParams,
    ) -> Result<EntropyEstimate, MseError> {
        params.validate()?;

        let phi_m = mean_log_frequency(series, params.dimension, params)?;
        let phi_m1 = mean_log_frequency(series, params.dimension + 1, params)?;

        Ok(EntropyEstimate {
            value: phi_m - phi_m1,
            phi: PhiPair {
                m: phi_m,
                m_plus_1: phi_m1,
            },
        })
    }
}

fn mean_log_frequency(
    series: &[f64],
    length: usize,
    params: &EmbeddingParams,
) -> Result<f64, MseError> {
    let span = (length - 1)
        .checked_mul(params.delay)
        .ok_or_else(|| MseError::invalid_input("dimension * delay overflow"))?;
    if series.len() <= span {
        return Err(MseError::invalid_input(format!(
            "series of length {} is too short to embed at dimension {} with delay {}",
            series.len(),
            length,
            params.delay
        )));
    }
    let n_vec = series.len() - span;

    let means: Option<Vec<f64>> = params.fuzzy.then(|| {
        (0..n_vec)
            .map(|i| {
                let mut sum = 0.0;
                for k in 0..length {
                    sum += series[i + k * params.delay];
                }
                sum / length as f64
            })
            .collect()
    });

    let mut log_sum = 0.0;
    for i in 0..n_vec {
        let mut similar = 0.0;
        for j in 0..n_vec {
            let mut distance = 0.0f64;
            let offset = means
                .as_ref()
                .map_or(0.0, |m| m[i] - m[j]);
            for k in 0..length {
                let d =
                    (series[i + k * params.delay] - series[j + k * params.delay] - offset).abs();
                if d > distance {
                    distance = d;
                }
            }
            if params.fuzzy {
                similar += membership(distance, params.tolerance);
            } else if distance <= params.tolerance {
                similar += 1.0;
            }
        }
        // The self-match keeps the frequency strictly positive.
        log_sum += (similar / n_vec as f64).ln();
    }

    Ok(log_sum / n_vec as f64)
}

#[cfg(test)]
mod tests {
    use super::ApproximateEntropy;
    use crate::model::{EmbeddingParams, EntropyEstimator};

    fn params(tolerance: f64) -> EmbeddingParams {
        EmbeddingParams {
            tolerance,
            ..EmbeddingParams::default()
        }
    }

    #[test]
    fn constant_signal_has_zero_entropy() {
        let series = [2.5; 100];
        let estimate = ApproximateEntropy
            .estimate(&series, &params(0.0))
            .expect("estimate should compute");
        assert!(estimate.value.abs() < 1e-12);
    }

    #[test]
    fn value_is_always_finite() {
        // Even a wildly irregular series cannot produce infinities because
        // self-matches keep every frequency positive.
        let series: Vec<f64> = (0..80)
            .map(|i| ((i * 73) % 97) as f64 - 48.0)
            .collect();
        let estimate = ApproximateEntropy
            .estimate(&series, &params(0.01))
            .expect("estimate should compute");
        assert!(estimate.value.is_finite());
    }

    #[test]
    fn irregular_exceeds_regular() {
        let regular: Vec<f64> = (0..200).map(|i| f64::from(i % 2)).collect();
        let irregular: Vec<f64> = (0..200)
            .map(|i| (i as f64 * 0.61803398875).fract())
            .collect();
        let params = params(0.2);
        let apen_regular = ApproximateEntropy
            .estimate(&regular, &params)
            .expect("regular estimate")
            .value;
        let apen_irregular = ApproximateEntropy
            .estimate(&irregular, &params)
            .expect("irregular estimate")
            .value;
        assert!(apen_irregular > apen_regular);
    }

    #[test]
    fn phi_pair_records_both_means() {
        let series: Vec<f64> = (0..120).map(|i| (i as f64 * 0.37).sin()).collect();
        let estimate = ApproximateEntropy
            .estimate(&series, &params(0.25))
            .expect("estimate should compute");
        assert!((estimate.value - (estimate.phi.m - estimate.phi.m_plus_1)).abs() < 1e-12);
    }

    #[test]
    fn too_short_series_is_an_input_error() {
        let series = [1.0, 2.0];
        assert!(ApproximateEntropy.estimate(&series, &params(0.2)).is_err());
    }

    #[test]
    fn fuzzy_variant_stays_finite_and_small_for_regular_signal() {
        let series: Vec<f64> = (0..150).map(|i| f64::from(i % 3)).collect();
        let fuzzy_params = EmbeddingParams {
            tolerance: 0.3,
            fuzzy: true,
            ..EmbeddingParams::default()
        };
        let estimate = ApproximateEntropy
            .estimate(&series, &fuzzy_params)
            .expect("estimate should compute");
        assert!(estimate.value.is_finite());
        assert!(estimate.value.abs() < 1.0);
    }
}
