// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::PhiPair;
use mse_core::MseError;

/// Embedding parameters shared by every entropy evaluation of one call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmbeddingParams {
    /// Lag between successive elements of a template vector.
    pub delay: usize,
    /// Embedding dimension m.
    pub dimension: usize,
    /// Similarity threshold r.
    pub tolerance: f64,
    /// Replaces hard threshold matching with a Gaussian membership.
    pub fuzzy: bool,
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self {
            delay: 1,
            dimension: 2,
            tolerance: 0.2,
            fuzzy: false,
        }
    }
}

impl EmbeddingParams {
    pub fn validate(&self) -> Result<(), MseError> {
        if self.delay == 0 {
            return Err(MseError::invalid_input("delay must be >= 1; got 0"));
        }
        if self.dimension == 0 {
            return Err(MseError::invalid_input("dimension must be >= 1; got 0"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MseError::invalid_input(format!(
                "tolerance must be finite and >= 0.0; got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Scalar entropy value plus the auxiliary phi statistics it came from.
///
/// `value` may be NaN or infinite: degenerate estimates are sentinels, not
/// errors, and callers are expected to filter them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntropyEstimate {
    pub value: f64,
    pub phi: PhiPair,
}

/// Contract between the multiscale pipeline and a base entropy estimator.
pub trait EntropyEstimator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Evaluates the estimator on one (coarse-grained) sequence.
    ///
    /// Fails only on structural problems (bad parameters, a sequence too
    /// short to embed at all); degenerate statistics come back as NaN or
    /// infinity inside the estimate.
    fn estimate(&self, series: &[f64], params: &EmbeddingParams)
    -> Result<EntropyEstimate, MseError>;
}
