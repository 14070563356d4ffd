// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Multiscale entropy (MSE) and its composite, refined-composite, and
//! fuzzy variants.
//!
//! The pipeline coarse-grains a one-dimensional signal at a set of integer
//! scale factors, applies a base entropy estimator at each scale, and
//! reduces the per-scale profile to a single area-under-curve index. The
//! four variants differ in exactly when averaging happens relative to the
//! estimator's logarithmic step; that ordering lives in [`Variant`] and the
//! per-scale combiner, and nowhere else.

mod coarse;
mod observability;
mod pipeline;
mod scales;
mod variants;

pub use coarse::{CoarseMethod, coarse_grain, coarse_grain_stack};
pub use observability::{EvalHooks, ProfileSink};
pub use pipeline::{
    EntropyProfile, EstimatorKind, MultiscaleConfig, MultiscaleResult, entropy_index,
    multiscale_entropy, multiscale_entropy_with_hooks,
};
pub use scales::{ScalePolicy, select_scales};
pub use variants::Variant;
