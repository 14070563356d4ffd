// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! The phi statistic: raw conditional-probability ratios at embedding
//! dimensions m and m+1, from which sample entropy is derived as a log
//! ratio. The refined-composite variant averages these ratios across
//! coarse-grained rows before taking the logarithm, so they are exposed
//! separately from the finished entropy value.

use mse_core::MseError;

/// Pre-logarithm match ratios at embedding dimensions m and m+1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhiPair {
    pub m: f64,
    pub m_plus_1: f64,
}

/// Counts template matches at dimensions m and m+1 over `series`.
///
/// Richman-Moorman counting: with `n_t = len - dimension * delay` template
/// vectors, every template also extends to length m+1, so both ratios are
/// normalized by the same `n_t * (n_t - 1)` ordered-pair count and the
/// resulting pair is directly comparable across rows of equal length.
/// Self-matches are excluded.
///
/// With `fuzzy` set, each template vector is mean-centered and the hard
/// indicator is replaced by the Gaussian membership
/// `exp(-d^2 / (2 r^2))`.
pub fn sample_phi(
    series: &[f64],
    delay: usize,
    dimension: usize,
    tolerance: f64,
    fuzzy: bool,
) -> Result<PhiPair, MseError> {
    if delay == 0 {
        return Err(MseError::invalid_input("delay must be >= 1; got 0"));
    }
    if dimension == 0 {
        return Err(MseError::invalid_input("dimension must be >= 1; got 0"));
    }

    let span = dimension
        .checked_mul(delay)
        .ok_or_else(|| MseError::invalid_input("dimension * delay overflow"))?;
    let n_t = series.len().saturating_sub(span);
    if n_t < 2 {
        return Err(MseError::invalid_input(format!(
            "series of length {} is too short to embed at dimension {} with delay {}",
            series.len(),
            dimension,
            delay
        )));
    }

    let (matches_m, matches_m1) = if fuzzy {
        count_fuzzy(series, n_t, delay, dimension, tolerance)
    } else {
        count_hard(series, n_t, delay, dimension, tolerance)
    };

    let norm = (n_t * (n_t - 1)) as f64;
    Ok(PhiPair {
        m: matches_m / norm,
        m_plus_1: matches_m1 / norm,
    })
}

/// The entropy estimator's log-ratio step over a (possibly averaged) pair.
///
/// No matches at dimension m means the conditional probability is
/// undefined: NaN. Matches at m but none at m+1 drive the ratio to zero
/// and the entropy to +infinity. Both sentinels are excluded from
/// downstream averaging by finiteness checks, never compared against NaN.
pub fn phi_divide(phi: &PhiPair) -> f64 {
    if phi.m.is_nan() || phi.m_plus_1.is_nan() {
        return f64::NAN;
    }
    if phi.m <= 0.0 {
        return f64::NAN;
    }
    let ratio = phi.m_plus_1 / phi.m;
    if ratio <= 0.0 {
        return f64::INFINITY;
    }
    -ratio.ln()
}

fn count_hard(
    series: &[f64],
    n_t: usize,
    delay: usize,
    dimension: usize,
    tolerance: f64,
) -> (f64, f64) {
    let mut matches_m = 0.0;
    let mut matches_m1 = 0.0;

    for i in 0..n_t {
        for j in (i + 1)..n_t {
            let d_m = chebyshev(series, i, j, dimension, delay);
            if d_m > tolerance {
                continue;
            }
            // Count both (i, j) and (j, i); the ratio is unaffected but the
            // normalization below is over ordered pairs.
            matches_m += 2.0;

            // The (m+1)-distance is max(d_m, last component), so the extra
            // component alone decides the extended match.
            let extra =
                (series[i + dimension * delay] - series[j + dimension * delay]).abs();
            if extra <= tolerance {
                matches_m1 += 2.0;
            }
        }
    }

    (matches_m, matches_m1)
}

fn count_fuzzy(
    series: &[f64],
    n_t: usize,
    delay: usize,
    dimension: usize,
    tolerance: f64,
) -> (f64, f64) {
    let mean_m: Vec<f64> = (0..n_t)
        .map(|i| template_mean(series, i, dimension, delay))
        .collect();
    let mean_m1: Vec<f64> = (0..n_t)
        .map(|i| template_mean(series, i, dimension + 1, delay))
        .collect();

    let mut matches_m = 0.0;
    let mut matches_m1 = 0.0;

    for i in 0..n_t {
        for j in (i + 1)..n_t {
            let d_m = centered_chebyshev(series, i, j, dimension, delay, mean_m[i] - mean_m[j]);
            matches_m += 2.0 * membership(d_m, tolerance);

            let d_m1 =
                centered_chebyshev(series, i, j, dimension + 1, delay, mean_m1[i] - mean_m1[j]);
            matches_m1 += 2.0 * membership(d_m1, tolerance);
        }
    }

    (matches_m, matches_m1)
}

fn chebyshev(series: &[f64], i: usize, j: usize, count: usize, delay: usize) -> f64 {
    let mut max = 0.0f64;
    for k in 0..count {
        let d = (series[i + k * delay] - series[j + k * delay]).abs();
        if d > max {
            max = d;
        }
    }
    max
}

fn centered_chebyshev(
    series: &[f64],
    i: usize,
    j: usize,
    count: usize,
    delay: usize,
    mean_diff: f64,
) -> f64 {
    let mut max = 0.0f64;
    for k in 0..count {
        let d = (series[i + k * delay] - series[j + k * delay] - mean_diff).abs();
        if d > max {
            max = d;
        }
    }
    max
}

/// Gaussian membership with degenerate guards: identical templates always
/// match fully, and a zero tolerance collapses to exact-equality matching.
pub(crate) fn membership(distance: f64, tolerance: f64) -> f64 {
    if distance <= 0.0 {
        return 1.0;
    }
    if tolerance <= 0.0 {
        return 0.0;
    }
    (-(distance * distance) / (2.0 * tolerance * tolerance)).exp()
}

fn template_mean(series: &[f64], i: usize, count: usize, delay: usize) -> f64 {
    let mut sum = 0.0;
    for k in 0..count {
        sum += series[i + k * delay];
    }
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use super::{PhiPair, membership, phi_divide, sample_phi};

    #[test]
    fn rejects_zero_delay_zero_dimension_and_short_series() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(sample_phi(&series, 0, 2, 0.2, false).is_err());
        assert!(sample_phi(&series, 1, 0, 0.2, false).is_err());
        // n_t = 3 - 2 = 1 < 2
        assert!(sample_phi(&series[..3], 1, 2, 0.2, false).is_err());
    }

    #[test]
    fn constant_series_matches_everything_even_at_zero_tolerance() {
        let series = [3.0; 20];
        let phi = sample_phi(&series, 1, 2, 0.0, false).expect("phi should compute");
        assert_eq!(phi.m, 1.0);
        assert_eq!(phi.m_plus_1, 1.0);
        assert_eq!(phi_divide(&phi), 0.0);
    }

    #[test]
    fn extended_matches_never_exceed_base_matches() {
        let series = [0.0, 1.0, 0.5, 2.0, 1.5, 0.25, 1.75, 0.75, 1.25, 0.1];
        let phi = sample_phi(&series, 1, 2, 0.5, false).expect("phi should compute");
        assert!(phi.m_plus_1 <= phi.m);
        assert!(phi.m >= 0.0 && phi.m <= 1.0);
        assert!(phi.m_plus_1 >= 0.0 && phi.m_plus_1 <= 1.0);
    }

    #[test]
    fn alternating_series_has_zero_sample_entropy() {
        // Perfectly regular: every template recurs exactly, so the ratio of
        // extended to base matches is 1 and the entropy is 0.
        let series: Vec<f64> = (0..40).map(|i| f64::from(i % 2)).collect();
        let phi = sample_phi(&series, 1, 2, 0.1, false).expect("phi should compute");
        assert!(phi.m > 0.0);
        assert_eq!(phi_divide(&phi), 0.0);
    }

    #[test]
    fn phi_divide_degenerate_cases_follow_sentinel_policy() {
        assert!(phi_divide(&PhiPair { m: 0.0, m_plus_1: 0.0 }).is_nan());
        assert_eq!(
            phi_divide(&PhiPair { m: 0.5, m_plus_1: 0.0 }),
            f64::INFINITY
        );
        assert!(phi_divide(&PhiPair { m: f64::NAN, m_plus_1: 0.5 }).is_nan());
        assert!(phi_divide(&PhiPair { m: 0.5, m_plus_1: f64::NAN }).is_nan());
        let value = phi_divide(&PhiPair { m: 0.5, m_plus_1: 0.25 });
        assert!((value - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn fuzzy_membership_guards_degenerate_inputs() {
        assert_eq!(membership(0.0, 0.0), 1.0);
        assert_eq!(membership(1.0, 0.0), 0.0);
        assert!((membership(0.2, 0.2) - (-0.5f64).exp()).abs() < 1e-12);
        assert!(membership(10.0, 0.1) < 1e-12);
    }

    #[test]
    fn fuzzy_phi_of_constant_series_is_full_match() {
        let series = [1.5; 16];
        let phi = sample_phi(&series, 1, 2, 0.0, true).expect("phi should compute");
        assert_eq!(phi.m, 1.0);
        assert_eq!(phi.m_plus_1, 1.0);
        assert_eq!(phi_divide(&phi), 0.0);
    }

    #[test]
    fn fuzzy_counts_are_continuous_in_tolerance() {
        let series = [0.0, 0.4, 0.1, 0.5, 0.2, 0.6, 0.3, 0.7, 0.15, 0.55];
        let tight = sample_phi(&series, 1, 2, 0.05, true).expect("tight phi");
        let loose = sample_phi(&series, 1, 2, 0.5, true).expect("loose phi");
        assert!(loose.m > tight.m);
        assert!(loose.m_plus_1 >= tight.m_plus_1);
    }

    #[test]
    fn delay_two_embedding_uses_lagged_components() {
        // With delay 2 the even and odd subsequences never mix inside one
        // template, so this strictly periodic signal is fully regular.
        let series: Vec<f64> = (0..30).map(|i| f64::from(i % 2) * 10.0).collect();
        let phi = sample_phi(&series, 2, 2, 0.5, false).expect("phi should compute");
        assert_eq!(phi_divide(&phi), 0.0);
    }
}
