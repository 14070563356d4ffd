// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Coarse-graining transforms: the resolution-reduction step that turns a
//! signal into its representation at a coarser time scale.

use mse_core::MseError;

/// One-dimensional coarse-graining modes selectable for the plain pipeline.
///
/// Decimation is the standard MSE transform; rolling-average and
/// interpolation give the modified (MMSE) and interpolated (IMSE)
/// renditions. The composite family always uses the time-shifted stack
/// from [`coarse_grain_stack`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoarseMethod {
    /// Non-overlapping window means of width `scale`.
    #[default]
    Decimation,
    /// Overlapping moving average of width `scale`.
    RollingAverage,
    /// Linear resampling down to `n / scale` evenly spaced points.
    Interpolation,
}

impl CoarseMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decimation => "decimation",
            Self::RollingAverage => "rolling",
            Self::Interpolation => "interpolate",
        }
    }
}

/// Coarse-grains `signal` once at `scale`.
///
/// Scale 1 is the identity for every mode. A scale larger than the signal
/// produces an empty series; the statistical-power gates downstream turn
/// that into a NaN per-scale value rather than an error here.
pub fn coarse_grain(signal: &[f64], scale: usize, method: CoarseMethod) -> Result<Vec<f64>, MseError> {
    if scale == 0 {
        return Err(MseError::invalid_input("scale factor must be >= 1; got 0"));
    }
    if signal.is_empty() {
        return Err(MseError::invalid_input("cannot coarse-grain an empty signal"));
    }
    if scale == 1 {
        return Ok(signal.to_vec());
    }

    match method {
        CoarseMethod::Decimation => Ok(decimate(signal, scale, 0)),
        CoarseMethod::RollingAverage => Ok(rolling_average(signal, scale)),
        CoarseMethod::Interpolation => Ok(resample_linear(signal, signal.len() / scale)),
    }
}

/// Builds the time-shifted stack the composite family evaluates: one
/// phase-shifted decimation per offset `0..scale`, truncated to the common
/// row length so the stack is rectangular. At scale 1 the stack is exactly
/// one row equal to the signal.
pub fn coarse_grain_stack(signal: &[f64], scale: usize) -> Result<Vec<Vec<f64>>, MseError> {
    if scale == 0 {
        return Err(MseError::invalid_input("scale factor must be >= 1; got 0"));
    }
    if signal.is_empty() {
        return Err(MseError::invalid_input("cannot coarse-grain an empty signal"));
    }

    // Common length of all offset rows: the worst-shifted row keeps
    // (n - scale + 1) samples before windowing.
    let rows_len = (signal.len().saturating_sub(scale - 1)) / scale;
    if rows_len == 0 {
        return Ok(Vec::new());
    }

    let mut stack = Vec::with_capacity(scale);
    for offset in 0..scale {
        let mut row = decimate(signal, scale, offset);
        row.truncate(rows_len);
        stack.push(row);
    }
    Ok(stack)
}

fn decimate(signal: &[f64], scale: usize, offset: usize) -> Vec<f64> {
    let n = signal.len();
    let count = n.saturating_sub(offset) / scale;
    let mut out = Vec::with_capacity(count);
    for j in 0..count {
        let start = offset + j * scale;
        let window = &signal[start..start + scale];
        out.push(window.iter().sum::<f64>() / scale as f64);
    }
    out
}

fn rolling_average(signal: &[f64], window: usize) -> Vec<f64> {
    if signal.len() < window {
        return Vec::new();
    }
    signal
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

fn resample_linear(signal: &[f64], target_len: usize) -> Vec<f64> {
    if target_len == 0 {
        return Vec::new();
    }
    if target_len == 1 {
        return vec![signal[0]];
    }

    let step = (signal.len() - 1) as f64 / (target_len - 1) as f64;
    let mut out = Vec::with_capacity(target_len);
    for k in 0..target_len {
        let position = k as f64 * step;
        let lower = position.floor() as usize;
        let upper = lower + 1;
        if upper >= signal.len() {
            out.push(signal[signal.len() - 1]);
        } else {
            let frac = position - lower as f64;
            out.push(signal[lower] * (1.0 - frac) + signal[upper] * frac);
        }
    }
    out
}
