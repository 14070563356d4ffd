// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use mse_core::MseError;

/// Katz fractal dimension (Katz 1988).
///
/// KFD = log10(L/a) / log10(d/a), with L the total curve length (sum of
/// successive absolute differences), a the mean step length, and d the
/// farthest excursion from the first sample. Straight lines sit near 1.0,
/// random walks near 1.15, and highly convoluted waveforms approach 1.5.
///
/// A flat signal has no curve length to normalize by; that degeneracy is
/// reported as NaN rather than an error.
pub fn katz_fd(signal: &[f64]) -> Result<f64, MseError> {
    if signal.len() < 2 {
        return Err(MseError::invalid_input(format!(
            "Katz fractal dimension needs at least 2 samples; got {}",
            signal.len()
        )));
    }

    let mut length = 0.0;
    for pair in signal.windows(2) {
        length += (pair[1] - pair[0]).abs();
    }
    let mean_step = length / (signal.len() - 1) as f64;

    let mut excursion = 0.0f64;
    for &v in &signal[1..] {
        let d = (v - signal[0]).abs();
        if d > excursion {
            excursion = d;
        }
    }

    if mean_step <= 0.0 || excursion <= 0.0 {
        return Ok(f64::NAN);
    }

    Ok((length / mean_step).log10() / (excursion / mean_step).log10())
}
