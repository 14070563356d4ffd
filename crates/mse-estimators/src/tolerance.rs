// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use mse_core::{MseError, stats};

/// Fraction of the signal standard deviation used by the default policy.
pub const DEFAULT_SD_FRACTION: f64 = 0.2;

/// How the similarity threshold r is derived from the raw signal.
///
/// Resolved exactly once per call, from the original (not coarse-grained)
/// signal, and shared by every entropy evaluation of that call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TolerancePolicy {
    /// r = fraction * sample standard deviation of the signal.
    SdFraction(f64),
    /// Caller-supplied absolute threshold.
    Fixed(f64),
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self::SdFraction(DEFAULT_SD_FRACTION)
    }
}

/// Resolves a tolerance policy against a signal.
///
/// A fixed tolerance must be finite and positive. An sd-derived tolerance
/// may legitimately resolve to 0 for a constant signal; matching then
/// degenerates to exact equality, which is exactly what a flat signal
/// needs to report zero entropy instead of NaN.
pub fn resolve_tolerance(signal: &[f64], policy: &TolerancePolicy) -> Result<f64, MseError> {
    if signal.is_empty() {
        return Err(MseError::invalid_input(
            "cannot derive a tolerance from an empty signal",
        ));
    }

    match *policy {
        TolerancePolicy::SdFraction(fraction) => {
            if !fraction.is_finite() || fraction <= 0.0 {
                return Err(MseError::invalid_input(format!(
                    "sd fraction must be finite and > 0.0; got {fraction}"
                )));
            }
            let tolerance = fraction * stats::std_dev(signal);
            if !tolerance.is_finite() {
                return Err(MseError::numerical_issue(
                    "signal standard deviation is not finite",
                ));
            }
            Ok(tolerance)
        }
        TolerancePolicy::Fixed(value) => {
            if !value.is_finite() || value <= 0.0 {
                return Err(MseError::invalid_input(format!(
                    "fixed tolerance must be finite and > 0.0; got {value}"
                )));
            }
            Ok(value)
        }
    }
}
