// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use mse_core::MseError;

/// How the ordered set of integer scale factors is derived.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ScalePolicy {
    /// Scales 1 up to `n / (dimension + 10)`, never fewer than one scale.
    #[default]
    Auto,
    /// Scales 1 up to `n / 2`.
    Max,
    /// Scales 1 up to the given bound.
    UpTo(usize),
    /// Caller-supplied scales, used verbatim.
    Explicit(Vec<usize>),
}

/// Derives the scale factors to evaluate for a signal of length `n`.
///
/// An empty selection is a configuration error: the caller asked for a
/// multiscale analysis that cannot evaluate a single scale, which must
/// surface instead of producing an empty profile.
pub fn select_scales(
    n: usize,
    dimension: usize,
    policy: &ScalePolicy,
) -> Result<Vec<usize>, MseError> {
    match policy {
        ScalePolicy::Auto => {
            let upper = (n / (dimension + 10)).max(1);
            Ok((1..=upper).collect())
        }
        ScalePolicy::Max => {
            let upper = n / 2;
            if upper == 0 {
                return Err(MseError::invalid_input(format!(
                    "signal of length {n} is too short for the max scale policy"
                )));
            }
            Ok((1..=upper).collect())
        }
        ScalePolicy::UpTo(bound) => {
            if *bound == 0 {
                return Err(MseError::invalid_input(
                    "scale bound must be >= 1; got 0",
                ));
            }
            Ok((1..=*bound).collect())
        }
        ScalePolicy::Explicit(scales) => {
            if scales.is_empty() {
                return Err(MseError::invalid_input(
                    "explicit scale list must not be empty",
                ));
            }
            if let Some(zero_at) = scales.iter().position(|&s| s == 0) {
                return Err(MseError::invalid_input(format!(
                    "explicit scale list contains 0 at index {zero_at}; scales must be >= 1"
                )));
            }
            Ok(scales.clone())
        }
    }
}
