// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::{EmbeddingParams, EntropyEstimate, EntropyEstimator};
use crate::phi::{phi_divide, sample_phi};
use mse_core::MseError;

/// Sample entropy (Richman & Moorman 2000).
///
/// SampEn = -ln(phi_{m+1} / phi_m) over self-match-free template counts.
/// Degenerate match counts surface as NaN or +infinity in the estimate
/// value, not as errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleEntropy;

impl EntropyEstimator for SampleEntropy {
    fn name(&self) -> &'static str {
        "sample_entropy"
    }

    fn estimate(
        &self,
        series: &[f64],
        params: &EmbeddingParams,
    ) -> Result<EntropyEstimate, MseError> {
        params.validate()?;
        let phi = sample_phi(
            series,
            params.delay,
            params.dimension,
            params.tolerance,
            params.fuzzy,
        )?;
        Ok(EntropyEstimate {
            value: phi_divide(&phi),
            phi,
        })
    }
}
