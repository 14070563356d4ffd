// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Entropy estimators and related statistics.
//!
//! The multiscale pipeline consumes these through the [`EntropyEstimator`]
//! seam: sample entropy and approximate entropy over an embedded sequence,
//! the raw phi statistic the refined-composite variant averages before its
//! logarithmic step, the tolerance-selection heuristic, and the standalone
//! Katz fractal-dimension utility.

mod approximate;
mod katz;
mod model;
mod phi;
mod sample;
mod tolerance;

pub use approximate::ApproximateEntropy;
pub use katz::katz_fd;
pub use model::{EmbeddingParams, EntropyEstimate, EntropyEstimator};
pub use phi::{PhiPair, phi_divide, sample_phi};
pub use sample::SampleEntropy;
pub use tolerance::{DEFAULT_SD_FRACTION, TolerancePolicy, resolve_tolerance};
